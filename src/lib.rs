//! voice-qa: voice and chat driven Q&A client.
//!
//! This crate sequences multi-turn dialogues against a Q&A backend:
//! ask → answer → offer alternate → teach-on-unknown, plus fruit prediction
//! and image upload.
//!
//! # Architecture
//!
//! - **Dialogue**: [`DialogueController`] runs one flow per user action and
//!   reports a [`FlowOutcome`]
//! - **Session**: [`SessionState`] carries pending and previous questions
//!   between flows
//! - **Speech**: [`speech::Speaker`] and [`speech::Listener`] are the engine
//!   seams; [`speech::VoiceIo`] adds timeouts and cancellation
//! - **Surface**: [`surface::Surface`] is where results, offers and alerts go
//! - **Backend**: the [`qa_client`] crate talks HTTP to the server

pub mod config;
pub mod dialogue;
pub mod error;
pub mod phrases;
pub mod session;
pub mod speech;
pub mod surface;

pub use config::{AssistantConfig, DialogueConfig, SpeechConfig};
pub use dialogue::{DialogueController, FlowOutcome};
pub use error::{DialogueError, Result};
pub use session::SessionState;
