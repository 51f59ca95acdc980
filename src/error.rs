//! Shared error type for the remote STT and LLM services.
//!
//! Both HTTP clients report failures through [`ServiceError`].  Every variant
//! carries the [`Service`] that failed so the rendered message is already
//! labelled for display (`"STT 401: ..."`, `"LLM 500: ..."`).
//!
//! [`ErrorKind`] is the flat, `Copy` classification stored in pipeline
//! results so callers can branch on the failure class without matching on
//! the full error.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Maximum number of characters of an upstream response body kept in
/// [`ServiceError::Upstream`].
pub const MAX_BODY_SNIPPET_CHARS: usize = 300;

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Which remote service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Speech-to-text (audio transcription endpoint).
    Stt,
    /// Large language model (chat completion endpoint).
    Llm,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Stt => write!(f, "STT"),
            Service::Llm => write!(f, "LLM"),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Failure classification, independent of the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No API key configured for the selected provider.
    MissingCredential,
    /// Non-2xx HTTP response.
    UpstreamError,
    /// 2xx response without usable content.
    EmptyResponse,
    /// 2xx response whose body could not be decoded.
    InvalidResponse,
    /// Transport-level failure (DNS, TLS, refused connection, timeout).
    NetworkError,
}

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Errors returned by [`TranscriptionClient`](crate::stt::TranscriptionClient)
/// and [`ChatCompletionClient`](crate::llm::ChatCompletionClient).
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Raised before any network call when the API key is empty.
    #[error("{service} API key is not configured for provider '{provider}'")]
    MissingCredential { service: Service, provider: String },

    /// The endpoint answered with a non-2xx status.
    #[error("{service} {status}: {body}")]
    Upstream {
        service: Service,
        status: u16,
        body: String,
    },

    /// The endpoint answered 2xx but produced no usable text.
    #[error("{service} returned an empty response")]
    EmptyResponse { service: Service },

    /// The endpoint answered 2xx with a body that is not the expected JSON.
    #[error("{service} returned an invalid response: {message}")]
    InvalidResponse { service: Service, message: String },

    /// The request never produced an HTTP response.
    #[error("{service} request failed: {message}")]
    Network { service: Service, message: String },
}

impl ServiceError {
    /// Build an [`ServiceError::Upstream`] with the body cut down to
    /// [`MAX_BODY_SNIPPET_CHARS`] characters.
    pub fn upstream(service: Service, status: u16, body: &str) -> Self {
        ServiceError::Upstream {
            service,
            status,
            body: truncate_chars(body.trim(), MAX_BODY_SNIPPET_CHARS),
        }
    }

    /// Wrap a transport error from `reqwest`.
    pub fn network(service: Service, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out ({err})")
        } else {
            err.to_string()
        };
        ServiceError::Network { service, message }
    }

    /// The flat classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::MissingCredential { .. } => ErrorKind::MissingCredential,
            ServiceError::Upstream { .. } => ErrorKind::UpstreamError,
            ServiceError::EmptyResponse { .. } => ErrorKind::EmptyResponse,
            ServiceError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            ServiceError::Network { .. } => ErrorKind::NetworkError,
        }
    }

    /// The service the failing request was addressed to.
    pub fn service(&self) -> Service {
        match self {
            ServiceError::MissingCredential { service, .. }
            | ServiceError::Upstream { service, .. }
            | ServiceError::EmptyResponse { service }
            | ServiceError::InvalidResponse { service, .. }
            | ServiceError::Network { service, .. } => *service,
        }
    }
}

/// Keep at most `max` characters (not bytes) of `s`.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
