//! Two-stage dictation pipeline.
//!
//! This module wires STT → silence check → LLM cleanup and turns every
//! outcome into a plain result value.
//!
//! # Architecture
//!
//! ```text
//! caller (CLI / host app)
//!        │  audio WAV + AppConfig snapshot + DictationContext
//!        ▼
//! PipelineOrchestrator::run()
//!        │
//!        ├─ resolve_stt   → SpeechToText::transcribe     [Transcribing]
//!        ├─ trim / blank? → PipelineResult::skipped      [CheckSilence]
//!        ├─ PromptBuilder + resolve_llm
//!        │                → ChatCompletion::complete      [Processing]
//!        └─ PipelineResult { raw_text, processed_text }   [Done | Failed]
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use voice_polish::config::AppConfig;
//! use voice_polish::pipeline::PipelineOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let wav = std::fs::read("recording.wav")?;
//!
//!     let orchestrator = PipelineOrchestrator::from_config(&config);
//!     let result = orchestrator.run(&wav, &config, None).await;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{
    PipelineOrchestrator, CONNECTION_TEST_MAX_TOKENS, CONNECTION_TEST_PROBE, REWRITE_SYSTEM_PROMPT,
};
pub use state::{ConnectionResult, PipelineResult, PipelineStage, TextResult};
