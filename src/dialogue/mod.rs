//! The dialogue controller.
//!
//! Every user action runs one flow: a short, linear sequence of prompts,
//! backend round trips and displayed results. Flows take the
//! [`SessionState`] explicitly and report a [`FlowOutcome`].
//!
//! Failures never escape a flow. They are mapped to one of four reactions:
//!
//! | Failure | Reaction |
//! |---------|----------|
//! | recognition unsupported | alert once, abort |
//! | no speech / timeout | silent reset |
//! | network or server error | generic apology, no retry |
//! | empty required field | inline message, nothing sent |
//!
//! After any failure the session is idle and the flow can be triggered again.

mod ask;
mod chat;
mod fruit;
mod regenerate;
mod search;
mod teach;

use crate::config::DialogueConfig;
use crate::error::{DialogueError, Result};
use crate::session::SessionState;
use crate::speech::VoiceIo;
use crate::surface::{Panel, Surface, Tone};
use qa_client::{ClientError, QaBackend};
use tracing::{debug, warn};

/// Spoken and displayed after a network or server failure.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again.";
/// Spoken when the recognizer fails for a reason other than silence.
pub const NOT_CAUGHT: &str = "Sorry, I didn't catch that. Please try again.";
/// Alerted once when there is no recognizer.
pub const UNSUPPORTED_ALERT: &str = "Speech recognition is not supported on this device.";

/// What a flow ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// An answer was shown (and spoken in voice mode).
    Answered {
        question: String,
        answer: String,
        source: String,
    },
    /// A different explanation replaced the previous answer.
    Regenerated { answer: String },
    /// Regeneration produced nothing new; nothing was updated.
    RegenerationUnchanged,
    /// The user turned down the regeneration offer.
    Declined,
    /// The backend asked for a corrected answer; the next input teaches it.
    AwaitingCorrection { question: String },
    /// No answer; search and teach were offered.
    AwaitingFollowUp { question: String },
    /// The user chose to teach; the next input is the answer.
    AwaitingTeachingAnswer { question: String },
    /// The backend recorded the input itself.
    Learned { message: String },
    /// An external search found an answer.
    Found {
        question: String,
        answer: String,
        source: String,
    },
    /// An external search found nothing.
    NotFound { question: String },
    /// A question/answer pair was stored.
    Taught { question: String, message: String },
    /// Several pairs were stored.
    BulkTaught { message: String },
    /// A fruit was recognised.
    Predicted {
        fruit: String,
        image_url: Option<String>,
    },
    /// No fruit matched.
    NotRecognized { reason: String },
    /// A fruit image was stored.
    FruitAdded {
        message: String,
        image_url: Option<String>,
    },
    /// Small talk, acknowledged locally.
    Acknowledged,
    /// The user cancelled, or the program is shutting down.
    Cancelled,
    /// A required field was empty; nothing was sent.
    Invalid { message: String },
    /// The backend refused the request.
    Rejected { message: String },
    /// Nothing was heard before the listening window closed.
    NoResponse,
    /// There is no speech recognizer.
    Unsupported,
    /// Network or server failure.
    Failed,
}

/// Runs dialogue flows against a backend, a surface and optional voice I/O.
pub struct DialogueController<B> {
    backend: B,
    surface: Box<dyn Surface>,
    voice: Option<VoiceIo>,
    config: DialogueConfig,
    unsupported_reported: bool,
}

impl<B: QaBackend> DialogueController<B> {
    /// A text-only controller. Voice flows report recognition as unsupported
    /// until [`with_voice`](Self::with_voice) is used.
    pub fn new(backend: B, surface: Box<dyn Surface>, config: DialogueConfig) -> Self {
        Self {
            backend,
            surface,
            voice: None,
            config,
            unsupported_reported: false,
        }
    }

    pub fn with_voice(mut self, voice: VoiceIo) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn has_voice(&self) -> bool {
        self.voice.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Speak when voice I/O exists; silent otherwise.
    async fn say(&mut self, session: &mut SessionState, text: &str) -> Result<()> {
        match self.voice.as_mut() {
            Some(voice) => voice.say(session, text).await,
            None => Ok(()),
        }
    }

    /// Speak a prompt and wait for the reply.
    async fn prompt(&mut self, session: &mut SessionState, text: &str) -> Result<Option<String>> {
        let voice = self
            .voice
            .as_mut()
            .ok_or(DialogueError::RecognitionUnsupported)?;
        voice.prompt(session, text).await
    }

    /// Pause for the turn gap, then listen without a spoken prompt.
    async fn listen_after_gap(&mut self, session: &mut SessionState) -> Result<Option<String>> {
        let voice = self
            .voice
            .as_mut()
            .ok_or(DialogueError::RecognitionUnsupported)?;
        voice.pause().await?;
        voice.listen(session).await
    }

    /// Turn a flow result into an outcome, applying the failure reactions.
    async fn finish(
        &mut self,
        session: &mut SessionState,
        panel: Panel,
        spoken: bool,
        result: Result<FlowOutcome>,
    ) -> FlowOutcome {
        let err = match result {
            Ok(FlowOutcome::NoResponse) => {
                debug!("no response, resetting");
                self.reset(session);
                return FlowOutcome::NoResponse;
            }
            Ok(FlowOutcome::Cancelled) => {
                self.reset(session);
                return FlowOutcome::Cancelled;
            }
            Ok(outcome) => return outcome,
            Err(err) => err,
        };

        self.reset(session);
        match err {
            DialogueError::RecognitionUnsupported => {
                if !self.unsupported_reported {
                    self.unsupported_reported = true;
                    self.surface.alert(UNSUPPORTED_ALERT);
                }
                FlowOutcome::Unsupported
            }
            DialogueError::Cancelled => FlowOutcome::Cancelled,
            DialogueError::Speech(reason) => {
                warn!(%reason, "speech failure");
                self.surface.show(panel, Tone::Error, NOT_CAUGHT);
                if spoken {
                    let _ = self.say(session, NOT_CAUGHT).await;
                }
                self.reset(session);
                FlowOutcome::NoResponse
            }
            DialogueError::Backend(ClientError::Validation(message)) => {
                self.surface.show(panel, Tone::Error, &message);
                FlowOutcome::Invalid { message }
            }
            DialogueError::Backend(ClientError::Rejected(message)) => {
                self.surface.show(panel, Tone::Error, &message);
                if spoken {
                    let _ = self.say(session, &message).await;
                }
                self.reset(session);
                FlowOutcome::Rejected { message }
            }
            other => {
                warn!(error = %other, "flow failed");
                self.surface.show(panel, Tone::Error, APOLOGY);
                if spoken {
                    let _ = self.say(session, APOLOGY).await;
                }
                self.reset(session);
                FlowOutcome::Failed
            }
        }
    }

    fn reset(&mut self, session: &mut SessionState) {
        session.reset();
        self.surface.clear_offers();
    }
}

impl<B> std::fmt::Debug for DialogueController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueController")
            .field("voice", &self.voice)
            .field("config", &self.config)
            .field("unsupported_reported", &self.unsupported_reported)
            .finish_non_exhaustive()
    }
}
