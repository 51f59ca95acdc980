//! Voice Polish: a two-stage dictation pipeline.
//!
//! Recorded speech goes to an OpenAI-compatible speech-to-text endpoint; the
//! transcript is then cleaned up by an OpenAI-compatible chat-completion
//! endpoint using a system prompt built from the user's settings.
//!
//! | Module       | Role                                                   |
//! |--------------|--------------------------------------------------------|
//! | [`config`]   | settings tree and TOML persistence                     |
//! | [`provider`] | provider catalogue and per-call connection options     |
//! | [`stt`]      | transcription client                                   |
//! | [`llm`]      | prompt builder, tone rules, chat-completion client     |
//! | [`pipeline`] | orchestration and result values                        |
//! | [`inject`]   | clipboard / paste delivery of the final text           |

pub mod config;
pub mod error;
pub mod http;
pub mod inject;
pub mod llm;
pub mod pipeline;
pub mod provider;
pub mod stt;

pub use error::{ErrorKind, Service, ServiceError};
pub use pipeline::{PipelineOrchestrator, PipelineResult};
