//! System prompt builder for transcript cleanup.
//!
//! [`PromptBuilder`] turns a configuration snapshot (and optional
//! [`DictationContext`]) into the LLM system prompt.  The prompt is a list of
//! lines appended in a fixed order:
//!
//! 1. Role preamble
//! 2. Filler-word removal            (`cleanup.filler_word_removal`)
//! 3. Repetition elimination         (`cleanup.repetition_elimination`)
//! 4. Self-correction detection      (`cleanup.self_correction_detection`)
//! 5. Auto-formatting                (`cleanup.auto_formatting`)
//! 6. Fixed rules (always present)
//! 7. Output language                (`output_language` not `auto`)
//! 8. Style directive                (`personalization.enabled`, outside ±0.3)
//! 9. Personal dictionary            (non-empty `dictionary`)
//! 10. Tone                          (context carries an app name)
//!
//! Later lines may refine but never contradict the fixed rules.  The builder
//! is pure: identical inputs give identical output.

use crate::config::{AppConfig, PersonalizationConfig, AUTO_LANGUAGE};
use crate::llm::context::DictationContext;
use crate::llm::tone::resolve_tone;

// ---------------------------------------------------------------------------
// Prompt lines
// ---------------------------------------------------------------------------

pub const PREAMBLE: &str = "You are a transcription post-processor. You receive raw speech-to-text output and return a cleaned-up version of what the speaker said.";

pub const FILLER_WORD_RULE: &str = "Remove filler words and sounds such as \"um\", \"uh\", \"er\", \"like\", \"you know\", \"那个\", \"嗯\", \"就是\".";

pub const REPETITION_RULE: &str =
    "Eliminate stutters and unintentional repetitions of words or phrases.";

pub const SELF_CORRECTION_RULE: &str = "When the speaker corrects themselves (for example \"at three, no, at four\"), keep only the final corrected statement.";

pub const FORMATTING_RULE: &str = "Add punctuation and capitalization, split run-on speech into sentences, and format spoken lists or steps as numbered or bulleted lists.";

/// Lines present in every prompt, regardless of toggles.
pub const FIXED_RULES: [&str; 4] = [
    "Fix obvious speech recognition errors while preserving the original meaning.",
    "Never add information the speaker did not say.",
    "Do not summarize or shorten the content beyond the cleanup described above.",
    "Output only the cleaned text, with no explanations, quotes or prefixes.",
];

/// Distance from zero beyond which a personalization slider takes effect.
pub const PERSONALIZATION_THRESHOLD: f32 = 0.3;

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the cleanup system prompt from a configuration snapshot.
///
/// # Example
/// ```rust
/// use voice_polish::config::AppConfig;
/// use voice_polish::llm::{DictationContext, PromptBuilder};
///
/// let config = AppConfig::default();
/// let prompt = PromptBuilder::new(&config).build(Some(&DictationContext::for_app("Slack")));
/// assert!(prompt.starts_with("You are a transcription post-processor."));
/// ```
pub struct PromptBuilder<'a> {
    config: &'a AppConfig,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// The prompt as a single newline-joined string.
    pub fn build(&self, context: Option<&DictationContext>) -> String {
        self.lines(context).join("\n")
    }

    /// The prompt lines in their contractual order.
    pub fn lines(&self, context: Option<&DictationContext>) -> Vec<String> {
        let cfg = self.config;
        let mut lines = vec![PREAMBLE.to_string()];

        let toggled = [
            (cfg.cleanup.filler_word_removal, FILLER_WORD_RULE),
            (cfg.cleanup.repetition_elimination, REPETITION_RULE),
            (cfg.cleanup.self_correction_detection, SELF_CORRECTION_RULE),
            (cfg.cleanup.auto_formatting, FORMATTING_RULE),
        ];
        lines.extend(
            toggled
                .iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, line)| line.to_string()),
        );

        lines.extend(FIXED_RULES.iter().map(|line| line.to_string()));

        if let Some(line) = output_language_line(&cfg.output_language) {
            lines.push(line);
        }
        if let Some(line) = style_line(&cfg.personalization) {
            lines.push(line);
        }
        if let Some(line) = dictionary_line(&cfg.dictionary) {
            lines.push(line);
        }

        if let Some(app) = context.and_then(DictationContext::app_name) {
            let resolved = resolve_tone(&cfg.tone.rules, cfg.tone.default_tone, app);
            log::debug!("llm: app {:?} resolved to tone {}", app, resolved.tone.as_str());
            lines.extend(resolved.prompt_lines());
        }

        lines
    }
}

// ---------------------------------------------------------------------------
// Line helpers
// ---------------------------------------------------------------------------

fn output_language_line(language: &str) -> Option<String> {
    let language = language.trim();
    if language.is_empty() || language.eq_ignore_ascii_case(AUTO_LANGUAGE) {
        return None;
    }
    Some(format!(
        "Write the final text in {language}, translating naturally if the speech is in another language."
    ))
}

fn style_line(p: &PersonalizationConfig) -> Option<String> {
    if !p.enabled {
        return None;
    }

    let mut parts = Vec::with_capacity(2);
    if p.formality > PERSONALIZATION_THRESHOLD {
        parts.push("use a formal register");
    } else if p.formality < -PERSONALIZATION_THRESHOLD {
        parts.push("use a casual register");
    }
    if p.verbosity > PERSONALIZATION_THRESHOLD {
        parts.push("be detailed and keep every point");
    } else if p.verbosity < -PERSONALIZATION_THRESHOLD {
        parts.push("be concise");
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("Style: {}.", parts.join(" and ")))
    }
}

/// Trimmed, de-duplicated, non-blank dictionary terms in insertion order.
pub fn dictionary_terms(dictionary: &[String]) -> Vec<&str> {
    let mut terms: Vec<&str> = Vec::with_capacity(dictionary.len());
    for term in dictionary.iter().map(|t| t.trim()) {
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

fn dictionary_line(dictionary: &[String]) -> Option<String> {
    let terms = dictionary_terms(dictionary);
    if terms.is_empty() {
        None
    } else {
        Some(format!(
            "Spell these terms exactly as written: {}.",
            terms.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
