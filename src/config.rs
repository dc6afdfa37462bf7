//! Configuration types for the voice-qa client.

use crate::error::{DialogueError, Result};
use qa_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Backend location and request settings.
    pub server: ClientConfig,
    /// Speech prompt timing and synthesizer settings.
    pub speech: SpeechConfig,
    /// Dialogue behaviour.
    pub dialogue: DialogueConfig,
}

/// Speech capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// How long a listening window stays open, in milliseconds.
    ///
    /// When it closes without a transcript the flow returns to idle.
    pub listen_timeout_ms: u64,
    /// Pause between the end of a prompt and the start of listening.
    pub turn_gap_ms: u64,
    /// Language tag, substituted for `{language}` in `tts_args`.
    pub language: String,
    /// External synthesizer program (e.g. `espeak`). `None` prints utterances.
    pub tts_command: Option<String>,
    /// Extra arguments passed before the utterance text (e.g. `["-v", "{language}"]`).
    pub tts_args: Vec<String>,
    /// When false, voice flows behave as if no recognizer exists.
    pub voice_enabled: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            listen_timeout_ms: 8_000,
            turn_gap_ms: 500,
            language: "en-US".to_owned(),
            tts_command: None,
            tts_args: Vec::new(),
            voice_enabled: true,
        }
    }
}

impl SpeechConfig {
    pub fn listen_timeout(&self) -> Duration {
        Duration::from_millis(self.listen_timeout_ms)
    }

    pub fn turn_gap(&self) -> Duration {
        Duration::from_millis(self.turn_gap_ms)
    }
}

/// Dialogue behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Replies that accept the "different explanation?" offer (case-insensitive,
    /// matched on word boundaries).
    pub affirmative_phrases: Vec<String>,
    /// Whether voice answers are followed by the regeneration offer.
    pub offer_regeneration: bool,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            affirmative_phrases: [
                "yes",
                "yeah",
                "yep",
                "sure",
                "yes i need",
                "please do",
                "go ahead",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            offer_regeneration: true,
        }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| DialogueError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DialogueError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/voice-qa/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("voice-qa").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("voice-qa")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/voice-qa-config/config.toml")
        }
    }

    /// Check every section, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`DialogueError::Config`] describing the invalid field.
    pub fn validate(&self) -> Result<()> {
        self.server
            .validate()
            .map_err(|e| DialogueError::Config(e.to_string()))?;
        if self.speech.listen_timeout_ms == 0 {
            return Err(DialogueError::Config(
                "speech.listen_timeout_ms must be greater than 0".into(),
            ));
        }
        if let Some(cmd) = &self.speech.tts_command {
            if cmd.trim().is_empty() {
                return Err(DialogueError::Config(
                    "speech.tts_command must not be empty when set".into(),
                ));
            }
        }
        if self
            .dialogue
            .affirmative_phrases
            .iter()
            .all(|p| p.trim().is_empty())
        {
            return Err(DialogueError::Config(
                "dialogue.affirmative_phrases needs at least one phrase".into(),
            ));
        }
        Ok(())
    }
}
