//! # qa-client
//!
//! Typed HTTP client for the voice-qa question answering backend.
//!
//! ## Routes
//!
//! | Route | Method |
//! |-------|--------|
//! | `/ask` | [`QaBackend::ask`] |
//! | `/search`, `/search-and-learn` | [`QaBackend::search`] |
//! | `/teach` | [`QaBackend::teach`] |
//! | `/teach-bulk` | [`QaBackend::teach_bulk`] |
//! | `/regenerate-answer` | [`QaBackend::regenerate`] |
//! | `/predict` | [`QaBackend::predict`] |
//! | `/add-fruit` | [`QaBackend::add_fruit`] |
//!
//! ## Behaviour
//!
//! - Requests with empty required fields fail with
//!   [`ClientError::Validation`] before anything is sent
//! - 4xx responses with an `{error}` body become [`ClientError::Rejected`]
//! - Nothing is retried; callers decide how to report failures
//! - Questions are logged only at debug level

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use backend::QaBackend;
pub use client::QaClient;
pub use config::{ClientConfig, SearchEndpoint};
pub use error::{ClientError, Result};
pub use types::{
    AskOutcome, AskRequest, Found, FruitAdded, FruitUpload, PredictRequest, Prediction,
    RegenerateRequest, SearchRequest, TeachRequest,
};
