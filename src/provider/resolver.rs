//! Maps `role × provider` to concrete connection parameters.
//!
//! Resolution is a pure lookup over the configuration snapshot: no network
//! access, no validation, no caching.  [`ProviderOptions`] is rebuilt for
//! every call because the snapshot may differ between calls.

use crate::config::{AppConfig, ProviderCredentials};

use super::{LlmProvider, SttProvider};

/// `HTTP-Referer` value sent to OpenRouter to identify this application.
pub const OPENROUTER_REFERER: &str = "https://github.com/voice-polish/voice-polish";
/// `X-Title` value sent to OpenRouter.
pub const OPENROUTER_TITLE: &str = "Voice Polish";

/// Which half of the pipeline the options are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Stt,
    Llm,
}

/// Connection parameters for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Provider identifier, kept for error messages and logs.
    pub provider: &'static str,
    /// API root without a trailing slash.
    pub base_url: String,
    /// Bearer token; empty when not configured.
    pub api_key: String,
    pub model: String,
    /// Additional headers required by the provider.
    pub extra_headers: Vec<(String, String)>,
}

impl ProviderOptions {
    /// `true` when an API key is present.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Join `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

// The API key must never end up in logs through `{:?}`.
impl std::fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<empty>" })
            .field("model", &self.model)
            .field("extra_headers", &self.extra_headers)
            .finish()
    }
}

/// Resolve options for `role`.
///
/// `explicit_provider` overrides the provider selected in `config` for this
/// call only (used by connection tests); the configuration is not touched.
pub fn resolve(role: Role, config: &AppConfig, explicit_provider: Option<&str>) -> ProviderOptions {
    match role {
        Role::Stt => resolve_stt(config, explicit_provider.map(SttProvider::from_id)),
        Role::Llm => resolve_llm(config, explicit_provider.map(LlmProvider::from_id)),
    }
}

/// Typed variant of [`resolve`] for the STT role.
pub fn resolve_stt(config: &AppConfig, provider: Option<SttProvider>) -> ProviderOptions {
    let provider = provider.unwrap_or(config.stt.provider);
    build(
        provider.id(),
        config.stt.credentials(provider),
        provider.default_base_url(),
        provider.default_model(),
        Vec::new(),
    )
}

/// Typed variant of [`resolve`] for the LLM role.
pub fn resolve_llm(config: &AppConfig, provider: Option<LlmProvider>) -> ProviderOptions {
    let provider = provider.unwrap_or(config.llm.provider);
    let extra_headers = match provider {
        LlmProvider::OpenRouter => vec![
            ("HTTP-Referer".to_string(), OPENROUTER_REFERER.to_string()),
            ("X-Title".to_string(), OPENROUTER_TITLE.to_string()),
        ],
        LlmProvider::SiliconFlow | LlmProvider::OpenAi => Vec::new(),
    };
    build(
        provider.id(),
        config.llm.credentials(provider),
        provider.default_base_url(),
        provider.default_model(),
        extra_headers,
    )
}

fn build(
    provider: &'static str,
    creds: &ProviderCredentials,
    default_base_url: &str,
    default_model: &str,
    extra_headers: Vec<(String, String)>,
) -> ProviderOptions {
    let base_url = non_empty_or(&creds.base_url, default_base_url)
        .trim_end_matches('/')
        .to_string();
    let model = non_empty_or(&creds.model, default_model).to_string();
    let api_key = creds
        .api_key
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    ProviderOptions {
        provider,
        base_url,
        api_key,
        model,
        extra_headers,
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{OPENAI_BASE_URL, OPENROUTER_BASE_URL, SILICONFLOW_BASE_URL};

    fn header<'a>(opts: &'a ProviderOptions, name: &str) -> Option<&'a str> {
        opts.extra_headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn openrouter_always_carries_referer_and_title() {
        let mut config = AppConfig::default();
        config.llm.provider = LlmProvider::OpenRouter;

        let opts = resolve(Role::Llm, &config, None);
        assert_eq!(opts.provider, "openrouter");
        assert_eq!(header(&opts, "HTTP-Referer"), Some(OPENROUTER_REFERER));
        assert_eq!(header(&opts, "X-Title"), Some(OPENROUTER_TITLE));
        assert_eq!(opts.base_url, OPENROUTER_BASE_URL);
    }

    #[test]
    fn siliconflow_and_openai_have_no_extra_headers() {
        let config = AppConfig::default();
        for id in ["siliconflow", "openai"] {
            let opts = resolve(Role::Llm, &config, Some(id));
            assert!(opts.extra_headers.is_empty(), "{id} must not add headers");
        }
    }

    #[test]
    fn stt_never_has_extra_headers() {
        let config = AppConfig::default();
        assert!(resolve(Role::Stt, &config, Some("openrouter"))
            .extra_headers
            .is_empty());
    }

    #[test]
    fn picks_fields_scoped_to_selected_provider() {
        let mut config = AppConfig::default();
        config.stt.provider = SttProvider::OpenAi;
        config.stt.openai.api_key = Some("sk-stt-openai".into());
        config.stt.openai.model = "gpt-4o-transcribe".into();
        config.stt.siliconflow.api_key = Some("sk-stt-sf".into());

        let opts = resolve(Role::Stt, &config, None);
        assert_eq!(opts.provider, "openai");
        assert_eq!(opts.api_key, "sk-stt-openai");
        assert_eq!(opts.model, "gpt-4o-transcribe");
        assert_eq!(opts.base_url, OPENAI_BASE_URL);
    }

    #[test]
    fn empty_fields_fall_back_to_provider_defaults() {
        let config = AppConfig::default();
        let opts = resolve(Role::Stt, &config, None);

        assert_eq!(opts.provider, "siliconflow");
        assert_eq!(opts.base_url, SILICONFLOW_BASE_URL);
        assert_eq!(opts.model, SttProvider::SiliconFlow.default_model());
        assert_eq!(opts.api_key, "");
        assert!(!opts.has_api_key());
    }

    #[test]
    fn explicit_provider_overrides_without_mutating_config() {
        let mut config = AppConfig::default();
        config.llm.provider = LlmProvider::SiliconFlow;
        config.llm.openai.api_key = Some("sk-openai".into());
        let before = config.clone();

        let opts = resolve(Role::Llm, &config, Some("openai"));
        assert_eq!(opts.provider, "openai");
        assert_eq!(opts.api_key, "sk-openai");
        assert_eq!(config, before);
    }

    #[test]
    fn unknown_explicit_provider_uses_openai_branch() {
        let mut config = AppConfig::default();
        config.llm.openai.model = "gpt-4.1-mini".into();

        let opts = resolve(Role::Llm, &config, Some("anthropic"));
        assert_eq!(opts.provider, "openai");
        assert_eq!(opts.model, "gpt-4.1-mini");
    }

    #[test]
    fn custom_base_url_loses_trailing_slash() {
        let mut config = AppConfig::default();
        config.llm.provider = LlmProvider::OpenAi;
        config.llm.openai.base_url = "http://localhost:11434/v1/".into();

        let opts = resolve(Role::Llm, &config, None);
        assert_eq!(opts.base_url, "http://localhost:11434/v1");
        assert_eq!(
            opts.endpoint("/chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let mut config = AppConfig::default();
        config.llm.siliconflow.api_key = Some("sk-secret-value".into());

        let rendered = format!("{:?}", resolve(Role::Llm, &config, None));
        assert!(!rendered.contains("sk-secret-value"));
        assert!(rendered.contains("<set>"));
    }
}
