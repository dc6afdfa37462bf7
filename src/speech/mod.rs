//! Speech synthesis and recognition capabilities.
//!
//! The engines themselves live outside this crate; [`Speaker`] and
//! [`Listener`] are the seams. [`VoiceIo`] wraps one of each and enforces the
//! channel rules shared by every dialogue flow:
//!
//! - speaking and listening never overlap (listening silences the speaker,
//!   a new utterance replaces the previous one)
//! - every listening window is bounded by a timeout
//! - a [`CancellationToken`] aborts whatever is in flight

mod command;
mod console;

pub use command::CommandSpeaker;
pub use console::{ConsoleSpeaker, StdinListener, UnsupportedListener};

use crate::config::SpeechConfig;
use crate::error::{DialogueError, Result};
use crate::session::{Activity, SessionState};
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Text-to-speech output.
#[async_trait]
pub trait Speaker: Send {
    /// Say `text`, returning when the utterance has finished.
    async fn speak(&mut self, text: &str) -> Result<()>;

    /// Stop the current utterance, if any.
    async fn cancel(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Result of one listening window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    /// The recognizer produced a transcript.
    Transcript(String),
    /// No speech before the window closed.
    Nothing,
}

impl Heard {
    /// Trimmed transcript; blank transcripts count as [`Heard::Nothing`].
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Transcript(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            Self::Nothing => None,
        }
    }
}

/// Speech-to-text input.
#[async_trait]
pub trait Listener: Send {
    /// Open one recognition session and wait for a result.
    ///
    /// Returns [`DialogueError::RecognitionUnsupported`] when no recognizer
    /// exists. The window length is enforced by [`VoiceIo`].
    async fn listen(&mut self) -> Result<Heard>;
}

/// A speaker/listener pair with timing and cancellation.
pub struct VoiceIo {
    speaker: Box<dyn Speaker>,
    listener: Box<dyn Listener>,
    listen_timeout: Duration,
    turn_gap: Duration,
    cancel: CancellationToken,
}

impl VoiceIo {
    pub fn new(
        speaker: Box<dyn Speaker>,
        listener: Box<dyn Listener>,
        config: &SpeechConfig,
    ) -> Self {
        Self {
            speaker,
            listener,
            listen_timeout: config.listen_timeout(),
            turn_gap: config.turn_gap(),
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token (e.g. wired to Ctrl+C).
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Speak one utterance, replacing anything still playing.
    ///
    /// # Errors
    ///
    /// Returns the speaker's error, or [`DialogueError::Cancelled`].
    pub async fn say(&mut self, session: &mut SessionState, text: &str) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(DialogueError::Cancelled);
        }
        self.speaker.cancel().await?;
        session.set_activity(Activity::Speaking);
        debug!(chars = text.len(), "speaking");

        let result = tokio::select! {
            r = self.speaker.speak(text) => r,
            () = self.cancel.cancelled() => Err(DialogueError::Cancelled),
        };
        if matches!(result, Err(DialogueError::Cancelled)) {
            let _ = self.speaker.cancel().await;
        }

        session.set_activity(Activity::Idle);
        result
    }

    /// Open one listening window. Silence, a blank transcript and a closed
    /// window all come back as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DialogueError::RecognitionUnsupported`], the listener's
    /// error, or [`DialogueError::Cancelled`].
    pub async fn listen(&mut self, session: &mut SessionState) -> Result<Option<String>> {
        if self.cancel.is_cancelled() {
            return Err(DialogueError::Cancelled);
        }
        self.speaker.cancel().await?;
        session.set_activity(Activity::Listening);

        let result = tokio::select! {
            r = tokio::time::timeout(self.listen_timeout, self.listener.listen()) => match r {
                Ok(heard) => heard,
                Err(_) => {
                    debug!(timeout_ms = self.listen_timeout.as_millis() as u64, "listening window closed");
                    Ok(Heard::Nothing)
                }
            },
            () = self.cancel.cancelled() => Err(DialogueError::Cancelled),
        };

        session.set_activity(Activity::Idle);
        result.map(Heard::into_text)
    }

    /// Wait out the gap between an utterance and the next listening window.
    ///
    /// # Errors
    ///
    /// Returns [`DialogueError::Cancelled`] if cancelled while waiting.
    pub async fn pause(&self) -> Result<()> {
        tokio::select! {
            () = tokio::time::sleep(self.turn_gap) => Ok(()),
            () = self.cancel.cancelled() => Err(DialogueError::Cancelled),
        }
    }

    /// Speak a prompt, pause, then listen for the reply.
    ///
    /// # Errors
    ///
    /// Same as [`VoiceIo::say`] and [`VoiceIo::listen`].
    pub async fn prompt(&mut self, session: &mut SessionState, text: &str) -> Result<Option<String>> {
        self.say(session, text).await?;
        self.pause().await?;
        self.listen(session).await
    }
}

impl std::fmt::Debug for VoiceIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceIo")
            .field("listen_timeout", &self.listen_timeout)
            .field("turn_gap", &self.turn_gap)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
