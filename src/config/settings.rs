//! Application settings structs, defaults and TOML persistence.
//!
//! [`AppConfig`] is the configuration snapshot consumed by the pipeline.  The
//! core never reads it from a global: every call receives `&AppConfig`, so a
//! settings change between two dictations simply means passing a new value.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! and use `#[serde(default)]`, so a partial `settings.toml` loads with the
//! missing fields filled from the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::inject::DeliveryMode;
use crate::llm::tone::{Tone, ToneRule};
use crate::provider::{LlmProvider, SttProvider};

/// Language sentinel meaning "let the provider decide" / "keep the spoken
/// language".
pub const AUTO_LANGUAGE: &str = "auto";

// ---------------------------------------------------------------------------
// ProviderCredentials
// ---------------------------------------------------------------------------

/// Connection settings for one provider in one role.
///
/// Empty `base_url` / `model` fall back to the provider's defaults at
/// resolution time.  A missing or empty `api_key` is a valid state; it is
/// reported as a missing-credential error when a request is attempted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCredentials {
    /// Bearer token sent to the provider.
    pub api_key: Option<String>,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model identifier sent in the request.
    pub model: String,
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Speech-to-text provider selection and per-provider credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Provider used by the dictation pipeline.
    pub provider: SttProvider,
    pub siliconflow: ProviderCredentials,
    pub openai: ProviderCredentials,
}

impl SttConfig {
    /// Credentials stored for `provider`.
    pub fn credentials(&self, provider: SttProvider) -> &ProviderCredentials {
        match provider {
            SttProvider::SiliconFlow => &self.siliconflow,
            SttProvider::OpenAi => &self.openai,
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// LLM provider selection, per-provider credentials and sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider used for transcript cleanup and rewriting.
    pub provider: LlmProvider,
    pub siliconflow: ProviderCredentials,
    pub openrouter: ProviderCredentials,
    pub openai: ProviderCredentials,
    /// Sampling temperature for cleanup requests.
    pub temperature: f64,
    /// `max_tokens` for cleanup requests.
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            siliconflow: ProviderCredentials::default(),
            openrouter: ProviderCredentials::default(),
            openai: ProviderCredentials::default(),
            temperature: 0.3,
            max_tokens: 2048,
        }
    }
}

impl LlmConfig {
    /// Credentials stored for `provider`.
    pub fn credentials(&self, provider: LlmProvider) -> &ProviderCredentials {
        match provider {
            LlmProvider::SiliconFlow => &self.siliconflow,
            LlmProvider::OpenRouter => &self.openrouter,
            LlmProvider::OpenAi => &self.openai,
        }
    }
}

// ---------------------------------------------------------------------------
// CleanupConfig
// ---------------------------------------------------------------------------

/// Feature toggles for the transcript cleanup instructions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub filler_word_removal: bool,
    pub repetition_elimination: bool,
    pub self_correction_detection: bool,
    pub auto_formatting: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            filler_word_removal: true,
            repetition_elimination: true,
            self_correction_detection: true,
            auto_formatting: true,
        }
    }
}

// ---------------------------------------------------------------------------
// PersonalizationConfig
// ---------------------------------------------------------------------------

/// Style bias applied as an extra prompt directive.
///
/// Both settings range over `[-1.0, 1.0]`; values within `±0.3` are neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizationConfig {
    pub enabled: bool,
    /// Negative = casual, positive = formal.
    pub formality: f32,
    /// Negative = concise, positive = detailed.
    pub verbosity: f32,
}

// ---------------------------------------------------------------------------
// ToneConfig
// ---------------------------------------------------------------------------

/// Per-application tone rules, matched in order against the active app name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Tone used when no rule matches.
    pub default_tone: Tone,
    /// First match wins.
    pub rules: Vec<ToneRule>,
}

// ---------------------------------------------------------------------------
// OutputConfig / NetworkConfig
// ---------------------------------------------------------------------------

/// How polished text reaches the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: DeliveryMode,
}

/// HTTP client settings shared by both providers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout applied to the shared HTTP client.
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use voice_polish::config::AppConfig;
///
/// // Load (returns Default when the file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub stt: SttConfig,
    pub llm: LlmConfig,
    pub cleanup: CleanupConfig,
    pub personalization: PersonalizationConfig,
    pub tone: ToneConfig,
    /// Language hint sent to the STT provider, or [`AUTO_LANGUAGE`].
    pub input_language: String,
    /// Language the polished text is written in, or [`AUTO_LANGUAGE`].
    pub output_language: String,
    /// Terms whose spelling the LLM must preserve, in insertion order.
    pub dictionary: Vec<String>,
    pub output: OutputConfig,
    pub network: NetworkConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stt: SttConfig::default(),
            llm: LlmConfig::default(),
            cleanup: CleanupConfig::default(),
            personalization: PersonalizationConfig::default(),
            tone: ToneConfig::default(),
            input_language: AUTO_LANGUAGE.into(),
            output_language: AUTO_LANGUAGE.into(),
            dictionary: Vec::new(),
            output: OutputConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(original, loaded);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.stt.provider, SttProvider::SiliconFlow);
        assert_eq!(cfg.llm.provider, LlmProvider::SiliconFlow);
        assert!(cfg.stt.siliconflow.api_key.is_none());
        assert!((cfg.llm.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(cfg.llm.max_tokens, 2048);
        assert!(cfg.cleanup.filler_word_removal);
        assert!(cfg.cleanup.auto_formatting);
        assert!(!cfg.personalization.enabled);
        assert_eq!(cfg.tone.default_tone, Tone::Professional);
        assert!(cfg.tone.rules.is_empty());
        assert_eq!(cfg.input_language, AUTO_LANGUAGE);
        assert_eq!(cfg.output_language, AUTO_LANGUAGE);
        assert_eq!(cfg.output.mode, DeliveryMode::Clipboard);
        assert_eq!(cfg.network.request_timeout_secs, 60);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.stt.provider = SttProvider::OpenAi;
        cfg.stt.openai.api_key = Some("sk-stt".into());
        cfg.llm.provider = LlmProvider::OpenRouter;
        cfg.llm.openrouter.api_key = Some("sk-or".into());
        cfg.llm.openrouter.model = "anthropic/claude-3-haiku".into();
        cfg.cleanup.repetition_elimination = false;
        cfg.personalization = PersonalizationConfig {
            enabled: true,
            formality: 0.8,
            verbosity: -0.5,
        };
        cfg.tone.rules.push(ToneRule {
            app_pattern: "slack".into(),
            tone: Tone::Custom,
            custom_prompt: Some("Use emoji sparingly.".into()),
        });
        cfg.output_language = "English".into();
        cfg.dictionary = vec!["Kubernetes".into(), "PostgreSQL".into()];
        cfg.output.mode = DeliveryMode::Paste;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded, cfg);
        assert_eq!(loaded.dictionary, vec!["Kubernetes", "PostgreSQL"]);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            r#"
output_language = "Japanese"

[llm]
provider = "openai"

[llm.openai]
api_key = "sk-test"
"#,
        )
        .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.output_language, "Japanese");
        assert_eq!(cfg.llm.provider, LlmProvider::OpenAi);
        assert_eq!(cfg.llm.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.llm.openai.model, "");
        assert_eq!(cfg.llm.max_tokens, 2048);
        assert!(cfg.cleanup.self_correction_detection);
        assert_eq!(cfg.input_language, AUTO_LANGUAGE);
    }

    #[test]
    fn unknown_provider_id_falls_back_to_openai() {
        let cfg: AppConfig = toml::from_str(
            r#"
[stt]
provider = "deepgram"

[llm]
provider = "mystery"
"#,
        )
        .expect("parse");
        assert_eq!(cfg.stt.provider, SttProvider::OpenAi);
        assert_eq!(cfg.llm.provider, LlmProvider::OpenAi);
    }

    #[test]
    fn credentials_lookup_matches_provider() {
        let mut cfg = AppConfig::default();
        cfg.llm.openrouter.model = "or-model".into();
        cfg.stt.openai.model = "whisper-1".into();

        assert_eq!(cfg.llm.credentials(LlmProvider::OpenRouter).model, "or-model");
        assert_eq!(cfg.stt.credentials(SttProvider::OpenAi).model, "whisper-1");
        assert_eq!(cfg.stt.credentials(SttProvider::SiliconFlow).model, "");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "this is = = not toml").expect("write");

        assert!(AppConfig::load_from(&path).is_err());
    }
}
