//! Per-application tone selection.
//!
//! A [`ToneRule`] maps a lowercase substring of the active application's name
//! to a [`Tone`].  Rules are tried in list order and the first match wins;
//! when nothing matches the configured default tone applies.

use serde::{Deserialize, Serialize};

/// Writing tone requested from the LLM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Technical,
    Friendly,
    /// Uses the matching rule's `custom_prompt` instead of a fixed description.
    Custom,
}

impl Tone {
    /// Prompt line describing this tone.  `None` for [`Tone::Custom`].
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Tone::Professional => Some(
                "Tone: professional. Use clear, polished language suitable for work communication.",
            ),
            Tone::Casual => Some("Tone: casual. Keep the language relaxed and conversational."),
            Tone::Technical => Some(
                "Tone: technical. Use precise terminology and keep code, commands and identifiers exactly as spoken.",
            ),
            Tone::Friendly => Some("Tone: friendly. Keep the language warm and approachable."),
            Tone::Custom => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Technical => "technical",
            Tone::Friendly => "friendly",
            Tone::Custom => "custom",
        }
    }
}

/// Maps an application-name pattern to a tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneRule {
    /// Substring matched case-insensitively against the application name.
    pub app_pattern: String,
    pub tone: Tone,
    /// Extra instruction, only read when `tone` is [`Tone::Custom`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

impl ToneRule {
    /// `true` when this rule applies to `app_name_lower` (already lowercased).
    ///
    /// A blank pattern matches nothing.
    fn matches(&self, app_name_lower: &str) -> bool {
        let pattern = self.app_pattern.trim().to_lowercase();
        !pattern.is_empty() && app_name_lower.contains(&pattern)
    }

    /// The custom instruction, when this is a custom rule with non-blank text.
    pub fn custom_instruction(&self) -> Option<&str> {
        if self.tone != Tone::Custom {
            return None;
        }
        self.custom_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Outcome of tone resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTone<'a> {
    pub tone: Tone,
    /// The rule that matched, or `None` when the default tone was used.
    pub rule: Option<&'a ToneRule>,
}

impl ResolvedTone<'_> {
    /// Prompt lines for this tone: the fixed description, or the matching
    /// rule's custom instruction for [`Tone::Custom`].
    pub fn prompt_lines(&self) -> Vec<String> {
        match self.tone {
            Tone::Custom => self
                .rule
                .and_then(ToneRule::custom_instruction)
                .map(|s| vec![s.to_string()])
                .unwrap_or_default(),
            tone => tone
                .description()
                .map(|s| vec![s.to_string()])
                .unwrap_or_default(),
        }
    }
}

/// Resolve the tone for `app_name`: first matching rule, else `default_tone`.
pub fn resolve_tone<'a>(rules: &'a [ToneRule], default_tone: Tone, app_name: &str) -> ResolvedTone<'a> {
    let app = app_name.to_lowercase();
    match rules.iter().find(|rule| rule.matches(&app)) {
        Some(rule) => ResolvedTone {
            tone: rule.tone,
            rule: Some(rule),
        },
        None => ResolvedTone {
            tone: default_tone,
            rule: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, tone: Tone) -> ToneRule {
        ToneRule {
            app_pattern: pattern.into(),
            tone,
            custom_prompt: None,
        }
    }

    #[test]
    fn first_match_wins() {
        let rules = vec![rule("code", Tone::Technical), rule("co", Tone::Casual)];
        let resolved = resolve_tone(&rules, Tone::Professional, "Visual Studio Code");
        assert_eq!(resolved.tone, Tone::Technical);
        assert_eq!(resolved.rule, Some(&rules[0]));
    }

    #[test]
    fn matching_ignores_case() {
        let rules = vec![rule("SLACK", Tone::Casual)];
        assert_eq!(
            resolve_tone(&rules, Tone::Professional, "slack.exe").tone,
            Tone::Casual
        );
    }

    #[test]
    fn unmatched_uses_default() {
        let rules = vec![rule("terminal", Tone::Technical)];
        let resolved = resolve_tone(&rules, Tone::Friendly, "Mail");
        assert_eq!(resolved.tone, Tone::Friendly);
        assert!(resolved.rule.is_none());
    }

    #[test]
    fn blank_pattern_never_matches() {
        let rules = vec![rule("  ", Tone::Casual)];
        assert_eq!(
            resolve_tone(&rules, Tone::Professional, "Anything").tone,
            Tone::Professional
        );
    }

    #[test]
    fn custom_rule_yields_its_prompt() {
        let rules = vec![ToneRule {
            app_pattern: "discord".into(),
            tone: Tone::Custom,
            custom_prompt: Some("  Write like a gamer.  ".into()),
        }];
        let resolved = resolve_tone(&rules, Tone::Professional, "Discord");
        assert_eq!(resolved.prompt_lines(), vec!["Write like a gamer."]);
    }

    #[test]
    fn custom_without_prompt_adds_nothing() {
        let rules = vec![rule("discord", Tone::Custom)];
        let resolved = resolve_tone(&rules, Tone::Professional, "Discord");
        assert_eq!(resolved.tone, Tone::Custom);
        assert!(resolved.prompt_lines().is_empty());
    }

    #[test]
    fn custom_default_tone_adds_nothing() {
        let resolved = resolve_tone(&[], Tone::Custom, "Notes");
        assert!(resolved.prompt_lines().is_empty());
    }

    #[test]
    fn custom_prompt_ignored_for_non_custom_tone() {
        let r = ToneRule {
            app_pattern: "mail".into(),
            tone: Tone::Friendly,
            custom_prompt: Some("ignored".into()),
        };
        assert!(r.custom_instruction().is_none());
        let resolved = resolve_tone(std::slice::from_ref(&r), Tone::Professional, "Mail");
        assert_eq!(
            resolved.prompt_lines(),
            vec![Tone::Friendly.description().unwrap_or_default().to_string()]
        );
    }

    #[test]
    fn every_fixed_tone_has_a_description() {
        for tone in [Tone::Professional, Tone::Casual, Tone::Technical, Tone::Friendly] {
            assert!(tone.description().is_some(), "{}", tone.as_str());
        }
        assert!(Tone::Custom.description().is_none());
    }
}
