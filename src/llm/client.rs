//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! [`ChatCompletionClient`] performs exactly one `POST {base_url}/chat/completions`
//! per call.  There is no retry at this layer: a failed request is reported
//! to the caller as a [`ServiceError`] and the user decides whether to try
//! again.
//!
//! [`ChatCompletion`] is the seam the pipeline depends on, so tests can
//! substitute a double that records requests.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{Service, ServiceError};
use crate::provider::ProviderOptions;

/// Sampling temperature used when the request does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
/// `max_tokens` used when the request does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One chat message as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Everything needed for one completion call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub options: ProviderOptions,
    pub messages: Vec<ChatMessage>,
    /// Defaults to [`DEFAULT_TEMPERATURE`].
    pub temperature: Option<f64>,
    /// Defaults to [`DEFAULT_MAX_TOKENS`].
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(options: ProviderOptions, messages: Vec<ChatMessage>) -> Self {
        Self {
            options,
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// JSON body sent to `/chat/completions`.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({
            "model": self.options.model,
            "messages": self.messages,
            "temperature": self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            "max_tokens": self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        })
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Pull `choices[0].message.content`, trimmed.
///
/// Only a body that is not JSON is an error here.  Any JSON shape without a
/// non-blank string at that path (missing or `null` choices, non-string
/// content) yields `None`, which the caller reports as an empty response.
fn first_choice_content(body: &str) -> Result<Option<String>, ServiceError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ServiceError::InvalidResponse {
            service: Service::Llm,
            message: e.to_string(),
        })?;

    Ok(json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

// ---------------------------------------------------------------------------
// ChatCompletion trait
// ---------------------------------------------------------------------------

/// Async seam for chat completion.
///
/// Implementors must be `Send + Sync` so they can be held behind an
/// `Arc<dyn ChatCompletion>`.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Run one completion and return the trimmed assistant text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ServiceError>;
}

// ---------------------------------------------------------------------------
// ChatCompletionClient
// ---------------------------------------------------------------------------

/// Calls `{base_url}/chat/completions` with bearer auth.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
}

impl ChatCompletionClient {
    /// Wrap an existing HTTP client (shared connection pool, timeouts).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the unsent request.
    ///
    /// Callers that want their own timeout or cancellation can attach it to
    /// the returned builder before sending.  Fails with
    /// [`ServiceError::MissingCredential`] when no API key is configured.
    pub fn build_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, ServiceError> {
        let opts = &request.options;
        if !opts.has_api_key() {
            return Err(ServiceError::MissingCredential {
                service: Service::Llm,
                provider: opts.provider.to_string(),
            });
        }

        let url = opts.endpoint("chat/completions");
        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(&opts.api_key)
            .json(&request.body());
        for (name, value) in &opts.extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        Ok(builder)
    }

    /// Send a request built by [`build_request`](Self::build_request) (or
    /// a caller-modified copy of it) and interpret the response.
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, ServiceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ServiceError::network(Service::Llm, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::network(Service::Llm, e))?;

        if !status.is_success() {
            return Err(ServiceError::upstream(Service::Llm, status.as_u16(), &body));
        }

        first_choice_content(&body)?.ok_or(ServiceError::EmptyResponse {
            service: Service::Llm,
        })
    }
}

#[async_trait]
impl ChatCompletion for ChatCompletionClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ServiceError> {
        let builder = self.build_request(request)?;
        log::debug!(
            "llm: POST {} (provider={}, model={}, messages={})",
            request.options.endpoint("chat/completions"),
            request.options.provider,
            request.options.model,
            request.messages.len()
        );
        self.send(builder).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
