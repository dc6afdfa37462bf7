//! Error types for the voice-qa dialogue layer.

use qa_client::ClientError;

/// Top-level error type for dialogue flows and their capabilities.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    /// No speech recognition capability is available.
    #[error("speech recognition is not supported")]
    RecognitionUnsupported,

    /// Speech synthesis or recognition failed.
    #[error("speech error: {0}")]
    Speech(String),

    /// Backend request failed or was rejected.
    #[error("backend error: {0}")]
    Backend(#[from] ClientError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The flow was cancelled (Ctrl+C or shutdown).
    #[error("cancelled")]
    Cancelled,
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, DialogueError>;
