//! Runtime context attached to a single dictation.
//!
//! [`DictationContext`] is supplied by the host application (the active
//! window tracker) and only lives for one pipeline call.  The prompt builder
//! reads `app_name` to pick a tone; the transcription stage reads
//! `language` as a per-call override of the configured input language.

/// Optional per-call context.
///
/// # Example
/// ```rust
/// use voice_polish::llm::DictationContext;
///
/// let ctx = DictationContext::for_app("Visual Studio Code");
/// assert_eq!(ctx.app_name(), Some("Visual Studio Code"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictationContext {
    /// Name of the application that will receive the text.
    pub app_name: Option<String>,
    /// Language code overriding `AppConfig::input_language` for this call.
    pub language: Option<String>,
}

impl DictationContext {
    /// Context naming the active application.
    pub fn for_app(app_name: impl Into<String>) -> Self {
        Self {
            app_name: Some(app_name.into()),
            language: None,
        }
    }

    /// Set the per-call input language override.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The application name, if present and not blank.
    pub fn app_name(&self) -> Option<&str> {
        non_blank(self.app_name.as_deref())
    }

    /// The language override, if present and not blank.
    pub fn language(&self) -> Option<&str> {
        non_blank(self.language.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
