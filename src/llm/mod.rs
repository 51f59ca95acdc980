//! LLM post-processing module.
//!
//! This module provides:
//! * [`ChatCompletion`]: async trait the pipeline calls for completions.
//! * [`ChatCompletionClient`]: OpenAI-compatible `/chat/completions` client.
//! * [`PromptBuilder`]: builds the cleanup system prompt from the config.
//! * [`DictationContext`]: per-call runtime context (active app, language).
//! * [`Tone`] / [`ToneRule`]: per-application tone selection.

pub mod client;
pub mod context;
pub mod prompt;
pub mod tone;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{
    ChatCompletion, ChatCompletionClient, ChatMessage, ChatRequest, ChatRole, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
pub use context::DictationContext;
pub use prompt::PromptBuilder;
pub use tone::{resolve_tone, ResolvedTone, Tone, ToneRule};
