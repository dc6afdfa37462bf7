//! Request and response bodies for every backend route.
//!
//! Response structs are lenient (`#[serde(default)]`): the backend omits
//! fields freely and sends `null` for "no answer".

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ClientError, Result};

/// Treat `None`, empty and whitespace-only strings alike.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── /ask ──────────────────────────────────────────────────────

/// Body of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_answer: Option<String>,
}

impl AskRequest {
    /// A question with no previous-turn context.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            last_question: None,
            last_answer: None,
        }
    }

    /// Attach the most recent resolved question/answer pair.
    pub fn with_context(mut self, last_question: Option<String>, last_answer: Option<String>) -> Self {
        self.last_question = last_question;
        self.last_answer = last_answer;
        self
    }
}

/// Raw `/ask` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AskResponse {
    pub answer: Option<String>,
    pub source: Option<String>,
    pub can_reteach: bool,
    pub needs_search: bool,
    pub needs_correction: bool,
    pub learned: bool,
    pub message: Option<String>,
}

/// What an `/ask` response means for the dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// The backend knows an answer.
    Answered { answer: String, source: String },
    /// The backend wants the user to confirm or correct the answer.
    NeedsCorrection { message: Option<String> },
    /// The backend stored the input as a taught answer.
    Learned { message: Option<String> },
    /// No answer; the user may search or teach.
    NoAnswer { message: Option<String> },
}

impl AskResponse {
    /// Source label used when the backend does not name one.
    pub const UNKNOWN_SOURCE: &'static str = "unknown";

    /// Collapse the response flags into a single discriminator.
    ///
    /// A non-empty answer wins over every marker.
    pub fn outcome(self) -> AskOutcome {
        let message = non_empty(self.message);
        if let Some(answer) = non_empty(self.answer) {
            let source = non_empty(self.source).unwrap_or_else(|| Self::UNKNOWN_SOURCE.to_owned());
            return AskOutcome::Answered { answer, source };
        }
        if self.needs_correction {
            return AskOutcome::NeedsCorrection { message };
        }
        if self.learned {
            return AskOutcome::Learned { message };
        }
        AskOutcome::NoAnswer { message }
    }
}

// ── /search, /search-and-learn ───────────────────────────────

/// Body of `POST /search` and `POST /search-and-learn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_question: Option<String>,
}

/// Raw search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub answer: Option<String>,
    pub source: Option<String>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub answer: String,
    pub source: String,
}

impl SearchResponse {
    /// Source label used when the backend does not name one.
    pub const DEFAULT_SOURCE: &'static str = "web";

    /// The hit, if the backend found anything.
    pub fn found(self) -> Option<Found> {
        let answer = non_empty(self.answer)?;
        let source = non_empty(self.source).unwrap_or_else(|| Self::DEFAULT_SOURCE.to_owned());
        Some(Found { answer, source })
    }
}

// ── /teach, /teach-bulk ──────────────────────────────────────

/// A question/answer pair to store. Body of `POST /teach`, and the element
/// type of `POST /teach-bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachRequest {
    pub question: String,
    pub answer: String,
}

impl TeachRequest {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Both fields contain something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

/// Raw `/teach` and `/teach-bulk` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeachResponse {
    pub message: Option<String>,
    pub error: Option<String>,
}

// ── /regenerate-answer ───────────────────────────────────────

/// Body of `POST /regenerate-answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerateRequest {
    pub question: String,
    /// The answer the user already heard.
    pub exclude: String,
}

/// Raw `/regenerate-answer` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenerateResponse {
    pub answer: Option<String>,
}

impl RegenerateResponse {
    /// The alternative answer, if any.
    pub fn into_answer(self) -> Option<String> {
        non_empty(self.answer)
    }
}

// ── /predict ─────────────────────────────────────────────────

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Raw `/predict` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictResponse {
    pub prediction: Option<String>,
    pub image_url: Option<String>,
    pub error: Option<String>,
}

/// What a `/predict` response means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prediction {
    /// A fruit was recognised.
    Match {
        fruit: String,
        image_url: Option<String>,
    },
    /// Nothing matched; carries the backend's explanation.
    NoMatch { reason: String },
}

impl PredictResponse {
    pub fn into_prediction(self) -> Prediction {
        match non_empty(self.prediction) {
            Some(fruit) => Prediction::Match {
                fruit,
                image_url: non_empty(self.image_url),
            },
            None => Prediction::NoMatch {
                reason: non_empty(self.error).unwrap_or_else(|| "No match found.".to_owned()),
            },
        }
    }
}

// ── /add-fruit ───────────────────────────────────────────────

/// An image to upload with its fruit label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruitUpload {
    pub name: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FruitUpload {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an image file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the file cannot be read or is empty.
    pub async fn from_path(name: impl Into<String>, path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::Validation(format!("cannot read image {}: {e}", path.display()))
        })?;
        if bytes.is_empty() {
            return Err(ClientError::Validation(format!(
                "image {} is empty",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_owned();
        Ok(Self::new(name, file_name, bytes))
    }

    /// MIME type guessed from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

/// Raw `/add-fruit` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddFruitResponse {
    pub message: Option<String>,
    pub error: Option<String>,
    pub image_url: Option<String>,
}

/// A stored fruit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruitAdded {
    pub message: String,
    pub image_url: Option<String>,
}
