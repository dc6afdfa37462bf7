//! The backend seam used by dialogue code.
//!
//! [`QaBackend`] normalises every route into typed outcomes so callers never
//! look at raw response flags. [`crate::QaClient`] is the HTTP
//! implementation; tests substitute scripted fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    AskOutcome, AskRequest, Found, FruitAdded, FruitUpload, PredictRequest, Prediction,
    RegenerateRequest, SearchRequest, TeachRequest,
};

/// Operations offered by the QA backend.
#[async_trait]
pub trait QaBackend: Send + Sync {
    /// Ask a question, with optional previous-turn context.
    async fn ask(&self, request: &AskRequest) -> Result<AskOutcome>;

    /// Look a question up externally. `None` means nothing was found.
    async fn search(&self, request: &SearchRequest) -> Result<Option<Found>>;

    /// Store a question/answer pair. Returns the backend's confirmation message.
    async fn teach(&self, request: &TeachRequest) -> Result<Option<String>>;

    /// Store several pairs in one request.
    async fn teach_bulk(&self, entries: &[TeachRequest]) -> Result<Option<String>>;

    /// Ask for an answer other than `request.exclude`.
    async fn regenerate(&self, request: &RegenerateRequest) -> Result<Option<String>>;

    /// Predict a fruit from spoken or typed text.
    async fn predict(&self, request: &PredictRequest) -> Result<Prediction>;

    /// Upload a labelled fruit image.
    async fn add_fruit(&self, upload: &FruitUpload) -> Result<FruitAdded>;
}

#[async_trait]
impl<T: QaBackend + ?Sized> QaBackend for std::sync::Arc<T> {
    async fn ask(&self, request: &AskRequest) -> Result<AskOutcome> {
        (**self).ask(request).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<Option<Found>> {
        (**self).search(request).await
    }

    async fn teach(&self, request: &TeachRequest) -> Result<Option<String>> {
        (**self).teach(request).await
    }

    async fn teach_bulk(&self, entries: &[TeachRequest]) -> Result<Option<String>> {
        (**self).teach_bulk(entries).await
    }

    async fn regenerate(&self, request: &RegenerateRequest) -> Result<Option<String>> {
        (**self).regenerate(request).await
    }

    async fn predict(&self, request: &PredictRequest) -> Result<Prediction> {
        (**self).predict(request).await
    }

    async fn add_fruit(&self, upload: &FruitUpload) -> Result<FruitAdded> {
        (**self).add_fruit(upload).await
    }
}
