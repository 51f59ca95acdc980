//! Provider catalogue and resolution.
//!
//! The provider set is small and closed, so each role gets a plain enum:
//!
//! | Role | Providers                               |
//! |------|-----------------------------------------|
//! | STT  | `siliconflow`, `openai`                 |
//! | LLM  | `siliconflow`, `openrouter`, `openai`   |
//!
//! Every provider speaks the OpenAI-compatible REST contract, so the enums
//! only carry defaults (base URL, model).  [`resolve`] turns a role plus the
//! configuration snapshot into fresh [`ProviderOptions`] for a single call.
//!
//! Unknown provider ids map to the OpenAI-compatible variant, both when
//! parsed with `from_id` and when deserialised from `settings.toml`.

pub mod resolver;

pub use resolver::{resolve, resolve_llm, resolve_stt, ProviderOptions, Role};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base URL of the SiliconFlow OpenAI-compatible API.
pub const SILICONFLOW_BASE_URL: &str = "https://api.siliconflow.cn/v1";
/// Base URL of the OpenRouter API.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Base URL of the OpenAI API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

// ---------------------------------------------------------------------------
// SttProvider
// ---------------------------------------------------------------------------

/// Speech-to-text providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SttProvider {
    #[default]
    SiliconFlow,
    #[serde(other)]
    OpenAi,
}

impl SttProvider {
    /// Stable lowercase identifier.
    pub fn id(&self) -> &'static str {
        match self {
            SttProvider::SiliconFlow => "siliconflow",
            SttProvider::OpenAi => "openai",
        }
    }

    /// Parse an identifier; anything unrecognised is treated as OpenAI-compatible.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "siliconflow" => SttProvider::SiliconFlow,
            _ => SttProvider::OpenAi,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            SttProvider::SiliconFlow => SILICONFLOW_BASE_URL,
            SttProvider::OpenAi => OPENAI_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            SttProvider::SiliconFlow => "FunAudioLLM/SenseVoiceSmall",
            SttProvider::OpenAi => "whisper-1",
        }
    }
}

impl fmt::Display for SttProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// LlmProvider
// ---------------------------------------------------------------------------

/// Chat-completion providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    SiliconFlow,
    OpenRouter,
    #[serde(other)]
    OpenAi,
}

impl LlmProvider {
    /// Stable lowercase identifier.
    pub fn id(&self) -> &'static str {
        match self {
            LlmProvider::SiliconFlow => "siliconflow",
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::OpenAi => "openai",
        }
    }

    /// Parse an identifier; anything unrecognised is treated as OpenAI-compatible.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "siliconflow" => LlmProvider::SiliconFlow,
            "openrouter" => LlmProvider::OpenRouter,
            _ => LlmProvider::OpenAi,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::SiliconFlow => SILICONFLOW_BASE_URL,
            LlmProvider::OpenRouter => OPENROUTER_BASE_URL,
            LlmProvider::OpenAi => OPENAI_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::SiliconFlow => "Qwen/Qwen2.5-7B-Instruct",
            LlmProvider::OpenRouter => "openai/gpt-4o-mini",
            LlmProvider::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
