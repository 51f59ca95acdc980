//! STT (Speech-to-Text) module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                SpeechToText (trait)                  │
//! │                                                      │
//! │   ┌────────────────┐    ┌──────────────────────┐     │
//! │   │ProviderOptions │───▶│ TranscriptionClient  │     │
//! │   │ (per call)     │    │ - reqwest::Client    │     │
//! │   └────────────────┘    └──────────┬───────────┘     │
//! │                                    │                 │
//! │                                    ▼                 │
//! │                 POST {base_url}/audio/transcriptions │
//! │                 multipart WAV → {"text": ...}        │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod client;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use client::{effective_language, SpeechToText, TranscriptionClient, AUDIO_FILE_NAME};
