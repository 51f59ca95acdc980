//! Command-line front end for Voice Polish.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (`RUST_LOG`, default `info`).
//! 2. Parse arguments.
//! 3. Load [`AppConfig`] from `--config` or the platform settings file.
//! 4. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Run the sub-command through [`PipelineOrchestrator`].
//!
//! Results go to stdout, diagnostics to stderr.  The process exits with
//! status 1 when the operation did not succeed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use voice_polish::{
    config::AppConfig,
    inject::{Delivery, TextInjector},
    llm::DictationContext,
    pipeline::{PipelineOrchestrator, PipelineResult, PipelineStage, TextResult},
};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "voice-polish", about = "Dictation cleanup: speech-to-text, then LLM polish", version)]
struct Args {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the full result as JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transcribe a WAV recording and polish the transcript
    Dictate {
        /// Mono 16-bit PCM WAV file
        #[arg(value_name = "WAV")]
        wav: PathBuf,

        /// Name of the application the text is meant for (selects the tone)
        #[arg(long, value_name = "NAME")]
        app: Option<String>,

        /// Spoken language for this recording, overriding the settings
        #[arg(long, value_name = "LANG")]
        language: Option<String>,

        /// Print only; do not copy or paste the result
        #[arg(long)]
        no_deliver: bool,
    },

    /// Polish already-transcribed text
    Process {
        #[arg(value_name = "TEXT")]
        text: String,

        /// Name of the application the text is meant for (selects the tone)
        #[arg(long, value_name = "NAME")]
        app: Option<String>,
    },

    /// Apply a free-form instruction to text
    Rewrite {
        #[arg(value_name = "TEXT")]
        text: String,

        /// What to do with the text, e.g. "make it shorter"
        #[arg(long, short, value_name = "INSTRUCTION")]
        instruction: String,
    },

    /// Check credentials and connectivity for an LLM provider
    TestConnection {
        /// siliconflow | openrouter | openai
        #[arg(value_name = "PROVIDER")]
        provider: String,
    },
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the operation ran but did not succeed.
fn run(args: Args) -> Result<bool> {
    let config = load_config(args.config.as_deref())?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let orchestrator = PipelineOrchestrator::from_config(&config);
    let json = args.json;

    rt.block_on(async move {
        match args.command {
            Command::Dictate {
                wav,
                app,
                language,
                no_deliver,
            } => {
                let audio = tokio::fs::read(&wav)
                    .await
                    .with_context(|| format!("failed to read {}", wav.display()))?;
                let context = build_context(app, language);

                let result = orchestrator.run(&audio, &config, context.as_ref()).await;
                print_pipeline_result(&result, json)?;

                if result.success && !no_deliver {
                    deliver(result.processed_text.clone(), &config).await;
                }
                Ok(result.success)
            }

            Command::Process { text, app } => {
                let context = build_context(app, None);
                let result = orchestrator
                    .process_text(&text, &config, context.as_ref())
                    .await;
                print_text_result(&result, json)
            }

            Command::Rewrite { text, instruction } => {
                let result = orchestrator.rewrite_text(&text, &instruction, &config).await;
                print_text_result(&result, json)
            }

            Command::TestConnection { provider } => {
                let result = orchestrator.test_connection(&config, &provider).await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else if let Some(message) = &result.message {
                    println!("{message}");
                } else if let Some(error) = &result.error {
                    eprintln!("connection test failed: {error}");
                }
                Ok(result.success)
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        // An explicit file must load; a broken default file falls back.
        Some(path) => AppConfig::load_from(path),
        None => Ok(AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e:#}); using defaults");
            AppConfig::default()
        })),
    }
}

fn build_context(app: Option<String>, language: Option<String>) -> Option<DictationContext> {
    if app.is_none() && language.is_none() {
        return None;
    }
    Some(DictationContext {
        app_name: app,
        language,
    })
}

fn print_pipeline_result(result: &PipelineResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    match result.stage() {
        PipelineStage::Skipped => eprintln!("no speech detected"),
        PipelineStage::Failed => {
            if !result.raw_text.is_empty() {
                eprintln!("transcript: {}", result.raw_text);
            }
            eprintln!("error: {}", result.error.as_deref().unwrap_or("unknown error"));
        }
        _ => println!("{}", result.processed_text),
    }
    Ok(())
}

fn print_text_result(result: &TextResult, json: bool) -> Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.success {
        println!("{}", result.text.as_deref().unwrap_or_default());
    } else {
        eprintln!("error: {}", result.error.as_deref().unwrap_or("unknown error"));
    }
    Ok(result.success)
}

/// Clipboard and key simulation block, so they run off the async workers.
/// Delivery problems are reported but do not fail the command.
async fn deliver(text: String, config: &AppConfig) {
    let mode = config.output.mode;
    let outcome =
        tokio::task::spawn_blocking(move || TextInjector::new().deliver(&text, mode)).await;

    match outcome {
        Ok(Ok(Delivery::Nothing)) => {}
        Ok(Ok(delivery)) => log::debug!("delivered: {delivery:?}"),
        Ok(Err(e)) => log::warn!("delivery failed: {e}"),
        Err(e) => log::warn!("delivery task panicked: {e}"),
    }
}
