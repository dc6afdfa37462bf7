//! Terminal stand-ins for speech engines.
//!
//! [`ConsoleSpeaker`] prints utterances; [`StdinListener`] treats each typed
//! line as a transcript. An empty line is "no speech".

use super::{Heard, Listener, Speaker};
use crate::error::{DialogueError, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin};

/// Prints each utterance on its own line.
pub struct ConsoleSpeaker<W> {
    out: W,
}

impl ConsoleSpeaker<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsoleSpeaker<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Speaker for ConsoleSpeaker<W> {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(format!("[assistant] {text}\n").as_bytes())
            .await?;
        self.out.flush().await?;
        Ok(())
    }
}

/// Reads one line from stdin per listening window.
pub struct StdinListener {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinListener {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for StdinListener {
    async fn listen(&mut self) -> Result<Heard> {
        let mut out = tokio::io::stdout();
        out.write_all(b"[listening] > ").await?;
        out.flush().await?;

        // `next_line` is cancel safe, so a closed window loses no input.
        match self.lines.next_line().await? {
            Some(line) if !line.trim().is_empty() => Ok(Heard::Transcript(line)),
            Some(_) => Ok(Heard::Nothing),
            None => Err(DialogueError::Cancelled),
        }
    }
}

/// A listener for hosts without speech recognition.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedListener;

#[async_trait]
impl Listener for UnsupportedListener {
    async fn listen(&mut self) -> Result<Heard> {
        Err(DialogueError::RecognitionUnsupported)
    }
}
