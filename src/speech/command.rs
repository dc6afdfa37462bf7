//! Speech synthesis through an external program such as `espeak` or `say`.

use super::Speaker;
use crate::error::{DialogueError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Runs `program [args..] <text>` once per utterance.
///
/// `{language}` inside an argument is replaced with the configured language
/// tag. The running child is killed when the utterance is cancelled or
/// replaced.
#[derive(Debug)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    current: Option<Child>,
}

impl CommandSpeaker {
    /// # Errors
    ///
    /// Returns [`DialogueError::Config`] if `program` is blank.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Result<Self> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(DialogueError::Config(
                "speech synthesizer command is empty".to_owned(),
            ));
        }
        Ok(Self {
            program,
            args,
            current: None,
        })
    }

    /// Substitute `language` for every `{language}` placeholder in the args.
    #[must_use]
    pub fn with_language(mut self, language: &str) -> Self {
        for arg in &mut self.args {
            *arg = arg.replace("{language}", language);
        }
        self
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.cancel().await?;

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DialogueError::Speech(format!("failed to start {}: {e}", self.program)))?;
        let child = self.current.insert(child);

        let status = child
            .wait()
            .await
            .map_err(|e| DialogueError::Speech(format!("{} did not finish: {e}", self.program)))?;
        self.current = None;

        if !status.success() {
            return Err(DialogueError::Speech(format!(
                "{} exited with status {}",
                self.program,
                status
                    .code()
                    .map_or_else(|| "unknown".to_owned(), |c| c.to_string())
            )));
        }
        Ok(())
    }

    async fn cancel(&mut self) -> Result<()> {
        if let Some(mut child) = self.current.take() {
            debug!(program = %self.program, "stopping utterance");
            if let Err(e) = child.kill().await {
                warn!(program = %self.program, error = %e, "failed to stop synthesizer");
            }
        }
        Ok(())
    }
}
