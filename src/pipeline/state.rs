//! Pipeline stages and result values.
//!
//! [`PipelineStage`] names the states the orchestrator walks through for one
//! dictation.  [`PipelineResult`], [`TextResult`] and [`ConnectionResult`]
//! are the plain values handed back to callers; none of them is mutated after
//! construction.

use serde::Serialize;

use crate::error::{ErrorKind, ServiceError};

// ---------------------------------------------------------------------------
// PipelineStage
// ---------------------------------------------------------------------------

/// States of one pipeline run.
///
/// The state machine transitions are:
///
/// ```text
/// Transcribing ──STT ok──▶ CheckSilence ──blank──▶ Skipped
///                                       ──text───▶ Processing ──LLM ok──▶ Done
/// Transcribing ──error──▶ Failed
/// Processing   ──error──▶ Failed   (raw text kept)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Waiting for the STT provider.
    Transcribing,

    /// Deciding whether the transcript holds any speech.
    CheckSilence,

    /// Waiting for the LLM provider.
    Processing,

    /// Both stages succeeded.
    Done,

    /// No speech detected; the LLM was not called.
    Skipped,

    /// A stage failed.
    Failed,
}

impl PipelineStage {
    /// `true` for states the run ends in.
    ///
    /// ```
    /// use voice_polish::pipeline::PipelineStage;
    ///
    /// assert!(!PipelineStage::Transcribing.is_terminal());
    /// assert!(!PipelineStage::Processing.is_terminal());
    /// assert!(PipelineStage::Done.is_terminal());
    /// assert!(PipelineStage::Skipped.is_terminal());
    /// assert!(PipelineStage::Failed.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineStage::Done | PipelineStage::Skipped | PipelineStage::Failed
        )
    }

    /// A short human-readable label, used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Transcribing => "Transcribing",
            PipelineStage::CheckSilence => "CheckSilence",
            PipelineStage::Processing => "Processing",
            PipelineStage::Done => "Done",
            PipelineStage::Skipped => "Skipped",
            PipelineStage::Failed => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineResult
// ---------------------------------------------------------------------------

/// Outcome of one [`run`](super::PipelineOrchestrator::run).
///
/// `success` and `error` are mutually exclusive.  `skipped` implies `success`
/// with both text fields empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub success: bool,
    pub raw_text: String,
    pub processed_text: String,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl PipelineResult {
    /// Both stages succeeded.
    pub fn done(raw_text: impl Into<String>, processed_text: impl Into<String>) -> Self {
        Self {
            success: true,
            raw_text: raw_text.into(),
            processed_text: processed_text.into(),
            skipped: false,
            error: None,
            error_kind: None,
        }
    }

    /// No speech detected.
    pub fn skipped() -> Self {
        Self {
            success: true,
            raw_text: String::new(),
            processed_text: String::new(),
            skipped: true,
            error: None,
            error_kind: None,
        }
    }

    /// A stage failed.  `raw_text` is empty when the STT stage failed and the
    /// transcript otherwise.
    pub fn failed(raw_text: impl Into<String>, err: &ServiceError) -> Self {
        Self {
            success: false,
            raw_text: raw_text.into(),
            processed_text: String::new(),
            skipped: false,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
        }
    }

    /// The terminal stage this result represents.
    pub fn stage(&self) -> PipelineStage {
        if !self.success {
            PipelineStage::Failed
        } else if self.skipped {
            PipelineStage::Skipped
        } else {
            PipelineStage::Done
        }
    }
}

// ---------------------------------------------------------------------------
// TextResult / ConnectionResult
// ---------------------------------------------------------------------------

/// Outcome of the LLM-only entry points (`process_text`, `rewrite_text`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl TextResult {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(err: &ServiceError) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
        }
    }

    /// A failure detected before any request, e.g. a blank instruction.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(message.into()),
            error_kind: None,
        }
    }
}

/// Outcome of `test_connection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(err: &ServiceError) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
