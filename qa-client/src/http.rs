//! Shared HTTP client construction and endpoint URL resolution.

use crate::config::ClientConfig;
use crate::error::ClientError;
use std::time::Duration;

/// Default User-Agent when none is configured.
const DEFAULT_USER_AGENT: &str = concat!("qa-client/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] configured for the QA backend.
///
/// The client has the timeout from config and either the configured or the
/// crate's default User-Agent.
///
/// # Errors
///
/// Returns [`ClientError::Http`] if the client cannot be constructed.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, ClientError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .build()
        .map_err(|e| ClientError::Http(format!("failed to build HTTP client: {e}")))
}

/// Parse the base URL so that relative endpoint paths append to it.
///
/// `http://host/api` and `http://host/api/` both resolve `ask` to
/// `http://host/api/ask`.
///
/// # Errors
///
/// Returns [`ClientError::Config`] if the base URL does not parse.
pub fn base_url(raw: &str) -> Result<url::Url, ClientError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    };
    url::Url::parse(&with_slash)
        .map_err(|e| ClientError::Config(format!("base_url is not a valid URL: {e}")))
}

/// Resolve an endpoint path against the base URL.
pub fn endpoint(base: &url::Url, path: &str) -> Result<url::Url, ClientError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ClientError::Config(format!("invalid endpoint path {path}: {e}")))
}
