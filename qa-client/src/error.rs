//! Error types for the qa-client crate.
//!
//! Messages are stable strings suitable for logs. Questions and answers are
//! never embedded in error messages.

/// Errors that can occur while talking to the QA backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The backend answered with a non-success status and no usable body.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Short description (body excerpt or reason phrase).
        message: String,
    },

    /// The backend refused the request with an explicit `{error}` message.
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// The response body was not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A required request field was empty; nothing was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the error came from the network or the server, as opposed to
    /// a local validation or configuration problem.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Decode(_))
    }
}

/// Convenience type alias for qa-client results.
pub type Result<T> = std::result::Result<T, ClientError>;
