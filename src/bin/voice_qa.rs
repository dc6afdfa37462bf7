//! CLI binary for voice-qa.

use anyhow::Context;
use clap::{Parser, Subcommand};
use qa_client::{QaClient, TeachRequest};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use voice_qa::speech::{
    CommandSpeaker, ConsoleSpeaker, Listener, Speaker, StdinListener, UnsupportedListener, VoiceIo,
};
use voice_qa::surface::TerminalSurface;
use voice_qa::{AssistantConfig, DialogueController, FlowOutcome, SessionState};

/// Voice and chat driven Q&A client.
#[derive(Parser)]
#[command(name = "voice-qa", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration file.
    #[arg(long)]
    server: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Typed chat with the assistant (default).
    Chat,

    /// Spoken Q&A loop. Typed lines stand in for speech.
    Voice,

    /// Ask one question.
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Search for an answer online.
    Search {
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Teach a question/answer pair.
    Teach {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },

    /// Teach a pair by voice.
    TeachVoice,

    /// Predict a fruit from a description, or by voice when none is given.
    Predict { text: Vec<String> },

    /// Upload a labelled fruit image.
    Upload {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image: PathBuf,
    },

    /// Teach every pair in a JSON file of `[{"question", "answer"}]`.
    TeachBulk { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout is the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("voice_qa=info,qa_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.server)?;

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down...");
            cancel_clone.cancel();
        }
    });

    let client = QaClient::new(config.server.clone()).context("failed to build backend client")?;
    let mut session = SessionState::new();

    let outcome = match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            run_chat(text_controller(client, &config), &mut session, cancel).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Voice => {
            run_voice(voice_controller(client, &config, cancel)?, &mut session).await;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Ask { question } => {
            text_controller(client, &config)
                .ask(&mut session, &question.join(" "))
                .await
        }
        Command::Search { question } => {
            text_controller(client, &config)
                .search(&mut session, &question.join(" "))
                .await
        }
        Command::Teach { question, answer } => {
            text_controller(client, &config)
                .teach(&mut session, &question, &answer)
                .await
        }
        Command::TeachVoice => {
            voice_controller(client, &config, cancel)?
                .teach_voice(&mut session)
                .await
        }
        Command::Predict { text } if text.is_empty() => {
            voice_controller(client, &config, cancel)?
                .predict_voice(&mut session)
                .await
        }
        Command::Predict { text } => {
            text_controller(client, &config)
                .predict(&mut session, &text.join(" "))
                .await
        }
        Command::Upload { name, image } => {
            text_controller(client, &config)
                .upload(&mut session, &name, &image)
                .await
        }
        Command::TeachBulk { file } => {
            let entries = read_bulk_file(&file).await?;
            text_controller(client, &config)
                .teach_bulk(&mut session, &entries)
                .await
        }
    };

    debug!(?outcome, "command finished");
    Ok(exit_code(&outcome))
}

/// Load the configuration file (explicit path, else the default location if
/// it exists), apply the `--server` override and validate.
fn load_config(path: Option<&Path>, server: Option<String>) -> anyhow::Result<AssistantConfig> {
    let mut config = match path {
        Some(path) => AssistantConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let default_path = AssistantConfig::default_config_path();
            if default_path.exists() {
                AssistantConfig::from_file(&default_path).with_context(|| {
                    format!("failed to load config from {}", default_path.display())
                })?
            } else {
                AssistantConfig::default()
            }
        }
    };
    if let Some(server) = server {
        config.server.base_url = server;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn text_controller(client: QaClient, config: &AssistantConfig) -> DialogueController<QaClient> {
    DialogueController::new(
        client,
        Box::new(TerminalSurface::stdout()),
        config.dialogue.clone(),
    )
}

fn voice_controller(
    client: QaClient,
    config: &AssistantConfig,
    cancel: CancellationToken,
) -> anyhow::Result<DialogueController<QaClient>> {
    let speaker: Box<dyn Speaker> = match &config.speech.tts_command {
        Some(program) => Box::new(
            CommandSpeaker::new(program.clone(), config.speech.tts_args.clone())?
                .with_language(&config.speech.language),
        ),
        None => Box::new(ConsoleSpeaker::stdout()),
    };
    let listener: Box<dyn Listener> = if config.speech.voice_enabled {
        Box::new(StdinListener::new())
    } else {
        Box::new(UnsupportedListener)
    };
    let voice = VoiceIo::new(speaker, listener, &config.speech).with_cancel_token(cancel);
    Ok(text_controller(client, config).with_voice(voice))
}

async fn run_chat(
    mut controller: DialogueController<QaClient>,
    session: &mut SessionState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    println!("voice-qa v{}", env!("CARGO_PKG_VERSION"));
    println!("Type a question. Ctrl+D or Ctrl+C to quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = cancel.cancelled() => None,
        };
        let Some(line) = line else {
            break;
        };
        controller.handle_chat(session, &line).await;
    }
    println!();
    Ok(())
}

async fn run_voice(mut controller: DialogueController<QaClient>, session: &mut SessionState) {
    println!("voice-qa v{}", env!("CARGO_PKG_VERSION"));
    println!("Voice mode: answer each prompt on its own line. Ctrl+C to quit.\n");

    loop {
        match controller.ask_voice(session).await {
            FlowOutcome::Cancelled | FlowOutcome::Unsupported => break,
            outcome => debug!(?outcome, "voice turn finished"),
        }
    }
}

async fn read_bulk_file(path: &Path) -> anyhow::Result<Vec<TeachRequest>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of question/answer pairs", path.display()))
}

fn exit_code(outcome: &FlowOutcome) -> ExitCode {
    match outcome {
        FlowOutcome::Failed
        | FlowOutcome::Invalid { .. }
        | FlowOutcome::Rejected { .. }
        | FlowOutcome::Unsupported => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
