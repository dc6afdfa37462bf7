//! Client configuration with sensible defaults.
//!
//! [`ClientConfig`] controls where the backend lives, request timeouts and
//! which search endpoint the client uses for "search online" follow-ups.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// Which backend route answers "search online" follow-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchEndpoint {
    /// `/search`: look the question up without storing the result.
    Search,
    /// `/search-and-learn`: look the question up and store the answer.
    #[default]
    SearchAndLearn,
}

impl SearchEndpoint {
    /// Route path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::SearchAndLearn => "search-and-learn",
        }
    }
}

/// Configuration for the QA backend client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, `qa-client/<version>` is used.
    pub user_agent: Option<String>,
    /// Route used by the search flow.
    pub search_endpoint: SearchEndpoint,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_owned(),
            timeout_seconds: 15,
            user_agent: None,
            search_endpoint: SearchEndpoint::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the search route.
    pub fn with_search_endpoint(mut self, endpoint: SearchEndpoint) -> Self {
        self.search_endpoint = endpoint;
        self
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` parses as an absolute `http`/`https` URL
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = url::Url::parse(self.base_url.trim())
            .map_err(|e| ClientError::Config(format!("base_url is not a valid URL: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::Config(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ClientError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
