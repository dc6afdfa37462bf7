//! HTTP implementation of [`QaBackend`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::QaBackend;
use crate::config::{ClientConfig, SearchEndpoint};
use crate::error::{ClientError, Result};
use crate::http;
use crate::types::{
    AddFruitResponse, AskOutcome, AskRequest, AskResponse, Found, FruitAdded, FruitUpload,
    PredictRequest, PredictResponse, Prediction, RegenerateRequest, RegenerateResponse,
    SearchRequest, SearchResponse, TeachRequest, TeachResponse,
};

/// Longest body excerpt carried in [`ClientError::Status`].
const MAX_BODY_EXCERPT: usize = 200;

/// Error body shape used by the backend for rejected requests.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the QA backend.
///
/// # Examples
///
/// ```no_run
/// use qa_client::{AskRequest, ClientConfig, QaBackend, QaClient};
///
/// # async fn example() -> qa_client::Result<()> {
/// let client = QaClient::new(ClientConfig::new("http://127.0.0.1:5000"))?;
/// let outcome = client.ask(&AskRequest::new("what is a mango")).await?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QaClient {
    client: reqwest::Client,
    base: url::Url,
    search_endpoint: SearchEndpoint,
}

impl QaClient {
    /// Build a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for an invalid configuration and
    /// [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: http::build_client(&config)?,
            base: http::base_url(&config.base_url)?,
            search_endpoint: config.search_endpoint,
        })
    }

    /// The route used by [`QaBackend::search`].
    pub fn search_endpoint(&self) -> SearchEndpoint {
        self.search_endpoint
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = http::endpoint(&self.base, path)?;
        debug!(endpoint = path, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("POST /{path} failed: {e}")))?;
        decode(path, response).await
    }
}

/// Map a response to `T`, turning 4xx `{error}` bodies into rejections.
async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ClientError::Http(format!("reading /{path} response failed: {e}")))?;

    if !status.is_success() {
        if status.is_client_error() {
            if let Ok(ErrorBody { error: Some(msg) }) = serde_json::from_str::<ErrorBody>(&text) {
                warn!(endpoint = path, status = status.as_u16(), "backend rejected request");
                return Err(ClientError::Rejected(msg));
            }
        }
        warn!(endpoint = path, status = status.as_u16(), "unexpected backend status");
        return Err(ClientError::Status {
            status: status.as_u16(),
            message: excerpt(&text, status),
        });
    }

    serde_json::from_str(&text).map_err(|e| ClientError::Decode(format!("/{path}: {e}")))
}

fn excerpt(body: &str, status: reqwest::StatusCode) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned();
    }
    trimmed.chars().take(MAX_BODY_EXCERPT).collect()
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[async_trait]
impl QaBackend for QaClient {
    async fn ask(&self, request: &AskRequest) -> Result<AskOutcome> {
        require(&request.question, "question")?;
        let response: AskResponse = self.post_json("ask", request).await?;
        Ok(response.outcome())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Option<Found>> {
        require(&request.question, "question")?;
        let response: SearchResponse = self
            .post_json(self.search_endpoint.path(), request)
            .await?;
        Ok(response.found())
    }

    async fn teach(&self, request: &TeachRequest) -> Result<Option<String>> {
        require(&request.question, "question")?;
        require(&request.answer, "answer")?;
        let response: TeachResponse = self.post_json("teach", request).await?;
        if let Some(error) = response.error {
            return Err(ClientError::Rejected(error));
        }
        Ok(response.message)
    }

    async fn teach_bulk(&self, entries: &[TeachRequest]) -> Result<Option<String>> {
        let valid: Vec<&TeachRequest> = entries.iter().filter(|e| e.is_complete()).collect();
        if valid.is_empty() {
            return Err(ClientError::Validation("no valid entries".into()));
        }
        if valid.len() < entries.len() {
            debug!(
                skipped = entries.len() - valid.len(),
                "dropping incomplete bulk entries"
            );
        }
        let response: TeachResponse = self.post_json("teach-bulk", &valid).await?;
        if let Some(error) = response.error {
            return Err(ClientError::Rejected(error));
        }
        Ok(response.message)
    }

    async fn regenerate(&self, request: &RegenerateRequest) -> Result<Option<String>> {
        require(&request.question, "question")?;
        let response: RegenerateResponse = self.post_json("regenerate-answer", request).await?;
        Ok(response.into_answer())
    }

    async fn predict(&self, request: &PredictRequest) -> Result<Prediction> {
        require(&request.text, "text")?;
        let response: PredictResponse = self.post_json("predict", request).await?;
        Ok(response.into_prediction())
    }

    async fn add_fruit(&self, upload: &FruitUpload) -> Result<FruitAdded> {
        require(&upload.name, "name")?;
        if upload.bytes.is_empty() {
            return Err(ClientError::Validation("image must not be empty".into()));
        }

        let image = reqwest::multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime_type())
            .map_err(|e| ClientError::Http(format!("invalid image part: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .text("name", upload.name.trim().to_owned())
            .part("image", image);

        let url = http::endpoint(&self.base, "add-fruit")?;
        debug!(endpoint = "add-fruit", bytes = upload.bytes.len(), "POST multipart");
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("POST /add-fruit failed: {e}")))?;
        let body: AddFruitResponse = decode("add-fruit", response).await?;

        if let Some(error) = body.error {
            return Err(ClientError::Rejected(error));
        }
        Ok(FruitAdded {
            message: body
                .message
                .unwrap_or_else(|| format!("Fruit '{}' added.", upload.name.trim())),
            image_url: body.image_url,
        })
    }
}
