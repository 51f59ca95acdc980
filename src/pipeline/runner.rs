//! Pipeline orchestrator: audio → STT → (silence check) → LLM → result.
//!
//! [`PipelineOrchestrator`] holds the two service seams and nothing else.
//! Every call takes the configuration snapshot as a parameter, so concurrent
//! runs never share mutable state.
//!
//! # Pipeline flow
//!
//! ```text
//! run(audio, config, context)
//!   └─▶ resolve STT options → stt.transcribe            [Transcribing]
//!         ├─ Err           → Failed (raw_text = "")
//!         └─ Ok(raw)       → trim                       [CheckSilence]
//!               ├─ blank   → Skipped (LLM not called)
//!               └─ text    → PromptBuilder + llm.complete [Processing]
//!                     ├─ Ok  → Done
//!                     └─ Err → Failed (raw_text kept)
//! ```
//!
//! No stage is retried.  Every failure is converted into the returned value;
//! nothing propagates past this module.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::http::build_client;
use crate::llm::{ChatCompletion, ChatCompletionClient, ChatMessage, ChatRequest, DictationContext, PromptBuilder};
use crate::provider::{resolve, resolve_llm, resolve_stt, Role};
use crate::stt::{effective_language, SpeechToText, TranscriptionClient};

use super::state::{ConnectionResult, PipelineResult, PipelineStage, TextResult};

/// System prompt for [`PipelineOrchestrator::rewrite_text`].
pub const REWRITE_SYSTEM_PROMPT: &str = "You are a text editor. Apply the user's instruction to the given text and output only the resulting text, with no explanations, quotes or prefixes.";

/// System message for [`PipelineOrchestrator::test_connection`].
pub const CONNECTION_TEST_SYSTEM_PROMPT: &str = "You are a connection test. Follow the instruction exactly.";

/// User message for [`PipelineOrchestrator::test_connection`].
pub const CONNECTION_TEST_PROBE: &str = "Reply with exactly: 'Connection successful!'";

/// `max_tokens` cap for the connection probe.
pub const CONNECTION_TEST_MAX_TOKENS: u32 = 20;

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Sequences the STT and LLM stages.
///
/// ```rust,no_run
/// use voice_polish::config::AppConfig;
/// use voice_polish::llm::DictationContext;
/// use voice_polish::pipeline::PipelineOrchestrator;
///
/// # async fn example(wav: Vec<u8>) {
/// let config = AppConfig::load().unwrap_or_default();
/// let orchestrator = PipelineOrchestrator::from_config(&config);
/// let context = DictationContext::for_app("Slack");
/// let result = orchestrator.run(&wav, &config, Some(&context)).await;
/// if result.success && !result.skipped {
///     println!("{}", result.processed_text);
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct PipelineOrchestrator {
    stt: Arc<dyn SpeechToText>,
    llm: Arc<dyn ChatCompletion>,
}

impl PipelineOrchestrator {
    /// Create an orchestrator over arbitrary service implementations.
    pub fn new(stt: Arc<dyn SpeechToText>, llm: Arc<dyn ChatCompletion>) -> Self {
        Self { stt, llm }
    }

    /// Create an orchestrator backed by the HTTP clients.
    ///
    /// Both clients share one connection pool configured from
    /// `config.network`.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = build_client(&config.network);
        Self::new(
            Arc::new(TranscriptionClient::new(client.clone())),
            Arc::new(ChatCompletionClient::new(client)),
        )
    }

    // -----------------------------------------------------------------------
    // End-to-end dictation
    // -----------------------------------------------------------------------

    /// Run one dictation: transcribe `audio` (a mono 16-bit PCM WAV file) and
    /// clean the transcript up.
    pub async fn run(
        &self,
        audio: &[u8],
        config: &AppConfig,
        context: Option<&DictationContext>,
    ) -> PipelineResult {
        // ── 1. Transcription ────────────────────────────────────────────
        enter(PipelineStage::Transcribing);
        let stt_options = resolve_stt(config, None);
        let language = effective_language(
            context.and_then(DictationContext::language),
            &config.input_language,
        );

        let raw_text = match self.stt.transcribe(audio, &stt_options, language).await {
            Ok(text) => text,
            Err(e) => return fail(String::new(), &e),
        };

        // ── 2. Silence check ────────────────────────────────────────────
        enter(PipelineStage::CheckSilence);
        let raw_text = raw_text.trim();
        if raw_text.is_empty() {
            log::info!("pipeline: no speech detected, skipping LLM");
            enter(PipelineStage::Skipped);
            return PipelineResult::skipped();
        }
        log::debug!("pipeline: STT result = {raw_text:?}");

        // ── 3. Cleanup ──────────────────────────────────────────────────
        enter(PipelineStage::Processing);
        let request = cleanup_request(raw_text, config, context);
        match self.llm.complete(&request).await {
            Ok(processed) => {
                log::debug!("pipeline: LLM result = {processed:?}");
                enter(PipelineStage::Done);
                PipelineResult::done(raw_text, processed)
            }
            Err(e) => fail(raw_text.to_string(), &e),
        }
    }

    // -----------------------------------------------------------------------
    // LLM-only entry points
    // -----------------------------------------------------------------------

    /// Clean up already-transcribed text with the same prompt as [`run`](Self::run).
    ///
    /// Blank input succeeds with an empty text and makes no request.
    pub async fn process_text(
        &self,
        raw_text: &str,
        config: &AppConfig,
        context: Option<&DictationContext>,
    ) -> TextResult {
        let raw_text = raw_text.trim();
        if raw_text.is_empty() {
            return TextResult::ok("");
        }

        let request = cleanup_request(raw_text, config, context);
        match self.llm.complete(&request).await {
            Ok(text) => TextResult::ok(text),
            Err(e) => {
                log::error!("pipeline: process_text failed: {e}");
                TextResult::failed(&e)
            }
        }
    }

    /// Apply a free-form `instruction` to `selected_text`.
    ///
    /// Uses [`REWRITE_SYSTEM_PROMPT`]; the cleanup prompt is not involved.
    pub async fn rewrite_text(
        &self,
        selected_text: &str,
        instruction: &str,
        config: &AppConfig,
    ) -> TextResult {
        let selected_text = selected_text.trim();
        let instruction = instruction.trim();
        if selected_text.is_empty() {
            return TextResult::rejected("no text to rewrite");
        }
        if instruction.is_empty() {
            return TextResult::rejected("rewrite instruction is empty");
        }

        let request = ChatRequest::new(
            resolve_llm(config, None),
            vec![
                ChatMessage::system(REWRITE_SYSTEM_PROMPT),
                ChatMessage::user(format!("Instruction: {instruction}\n\nText:\n{selected_text}")),
            ],
        )
        .with_temperature(config.llm.temperature)
        .with_max_tokens(config.llm.max_tokens);

        match self.llm.complete(&request).await {
            Ok(text) => TextResult::ok(text),
            Err(e) => {
                log::error!("pipeline: rewrite_text failed: {e}");
                TextResult::failed(&e)
            }
        }
    }

    /// Send the fixed probe to the LLM provider `provider_id` and return its
    /// reply.  The configured provider is not changed.
    pub async fn test_connection(&self, config: &AppConfig, provider_id: &str) -> ConnectionResult {
        let options = resolve(Role::Llm, config, Some(provider_id));
        log::info!("pipeline: testing connection to {}", options.provider);

        let request = ChatRequest::new(
            options,
            vec![
                ChatMessage::system(CONNECTION_TEST_SYSTEM_PROMPT),
                ChatMessage::user(CONNECTION_TEST_PROBE),
            ],
        )
        .with_max_tokens(CONNECTION_TEST_MAX_TOKENS);

        match self.llm.complete(&request).await {
            Ok(reply) => ConnectionResult::ok(reply),
            Err(e) => {
                log::warn!("pipeline: connection test failed: {e}");
                ConnectionResult::failed(&e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The cleanup request: built system prompt plus the transcript as user content.
fn cleanup_request(
    raw_text: &str,
    config: &AppConfig,
    context: Option<&DictationContext>,
) -> ChatRequest {
    let system_prompt = PromptBuilder::new(config).build(context);
    ChatRequest::new(
        resolve_llm(config, None),
        vec![ChatMessage::system(system_prompt), ChatMessage::user(raw_text)],
    )
    .with_temperature(config.llm.temperature)
    .with_max_tokens(config.llm.max_tokens)
}

fn enter(stage: PipelineStage) {
    log::debug!("pipeline: → {}", stage.label());
}

fn fail(raw_text: String, err: &ServiceError) -> PipelineResult {
    log::error!("pipeline: {} stage failed: {err}", err.service());
    enter(PipelineStage::Failed);
    PipelineResult::failed(raw_text, err)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
