//! Transcription client for OpenAI-compatible `/audio/transcriptions` endpoints.
//!
//! The audio is uploaded as a multipart form:
//!
//! | Field      | Value                                            |
//! |------------|--------------------------------------------------|
//! | `file`     | WAV bytes, file name `recording.wav`             |
//! | `model`    | provider model id                                |
//! | `language` | only when a language other than `auto` is set    |
//!
//! An empty `text` in a 2xx response is a valid result (silence) and is
//! returned as an empty string; the pipeline decides what to do with it.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::config::AUTO_LANGUAGE;
use crate::error::{Service, ServiceError};
use crate::provider::ProviderOptions;

/// File name given to the uploaded audio part.
pub const AUDIO_FILE_NAME: &str = "recording.wav";
const AUDIO_MIME: &str = "audio/wav";

/// The language to send: the per-call override if given, else the configured
/// language.  `None` when the result is blank or [`AUTO_LANGUAGE`].
pub fn effective_language<'a>(override_language: Option<&'a str>, configured: &'a str) -> Option<&'a str> {
    let language = override_language.unwrap_or(configured).trim();
    if language.is_empty() || language.eq_ignore_ascii_case(AUTO_LANGUAGE) {
        None
    } else {
        Some(language)
    }
}

/// Text fields of the multipart form, in the order they are added.
///
/// `language` is expected to be resolved already (see [`effective_language`]).
pub fn form_fields(options: &ProviderOptions, language: Option<&str>) -> Vec<(&'static str, String)> {
    let mut fields = vec![("model", options.model.clone())];
    if let Some(lang) = language {
        fields.push(("language", lang.to_string()));
    }
    fields
}

// ---------------------------------------------------------------------------
// SpeechToText trait
// ---------------------------------------------------------------------------

/// Async seam for speech-to-text.
///
/// Implementors must be `Send + Sync` so they can be held behind an
/// `Arc<dyn SpeechToText>`.
///
/// # Contract
///
/// - `audio` is a complete mono 16-bit PCM WAV file.
/// - `language` is already resolved (see [`effective_language`]); `None`
///   lets the provider detect it.
/// - `Ok("")` means no speech was recognised.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        options: &ProviderOptions,
        language: Option<&str>,
    ) -> Result<String, ServiceError>;
}

// ---------------------------------------------------------------------------
// TranscriptionClient
// ---------------------------------------------------------------------------

/// Calls `{base_url}/audio/transcriptions` with bearer auth.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    client: reqwest::Client,
}

impl TranscriptionClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the unsent multipart request.
    ///
    /// Fails with [`ServiceError::MissingCredential`] before touching the
    /// network when no API key is configured.
    pub fn build_request(
        &self,
        audio: &[u8],
        options: &ProviderOptions,
        language: Option<&str>,
    ) -> Result<reqwest::RequestBuilder, ServiceError> {
        if !options.has_api_key() {
            return Err(ServiceError::MissingCredential {
                service: Service::Stt,
                provider: options.provider.to_string(),
            });
        }

        let part = Part::bytes(audio.to_vec())
            .file_name(AUDIO_FILE_NAME)
            .mime_str(AUDIO_MIME)
            .map_err(|e| ServiceError::network(Service::Stt, e))?;

        let form = form_fields(options, language)
            .into_iter()
            .fold(Form::new().part("file", part), |form, (name, value)| {
                form.text(name, value)
            });

        Ok(self
            .client
            .post(options.endpoint("audio/transcriptions"))
            .bearer_auth(&options.api_key)
            .multipart(form))
    }

    /// Send a request built by [`build_request`](Self::build_request) and
    /// return the `text` field (empty when absent).
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, ServiceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ServiceError::network(Service::Stt, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::network(Service::Stt, e))?;

        if !status.is_success() {
            return Err(ServiceError::upstream(Service::Stt, status.as_u16(), &body));
        }

        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ServiceError::InvalidResponse {
                service: Service::Stt,
                message: e.to_string(),
            })?;

        Ok(json["text"].as_str().unwrap_or_default().to_string())
    }
}

#[async_trait]
impl SpeechToText for TranscriptionClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        options: &ProviderOptions,
        language: Option<&str>,
    ) -> Result<String, ServiceError> {
        let builder = self.build_request(audio, options, language)?;
        log::debug!(
            "stt: POST {} (provider={}, model={}, language={}, bytes={})",
            options.endpoint("audio/transcriptions"),
            options.provider,
            options.model,
            language.unwrap_or(AUTO_LANGUAGE),
            audio.len()
        );
        self.send(builder).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::{Matcher, Server};

    /// ASCII-only stand-in for a WAV payload so body regexes stay simple.
    const FAKE_WAV: &[u8] = b"RIFF0000WAVEfmt data";

    fn options(base_url: &str, api_key: &str) -> ProviderOptions {
        ProviderOptions {
            provider: "siliconflow",
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: "FunAudioLLM/SenseVoiceSmall".to_string(),
            extra_headers: Vec::new(),
        }
    }

    #[test]
    fn effective_language_prefers_override() {
        assert_eq!(effective_language(Some("en"), "zh"), Some("en"));
        assert_eq!(effective_language(None, "zh"), Some("zh"));
    }

    #[test]
    fn effective_language_drops_auto_and_blank() {
        assert_eq!(effective_language(None, "auto"), None);
        assert_eq!(effective_language(Some("AUTO"), "zh"), None);
        assert_eq!(effective_language(None, "  "), None);
    }

    #[test]
    fn language_field_only_when_set() {
        let opts = options("http://localhost", "k");
        assert_eq!(
            form_fields(&opts, None),
            vec![("model", "FunAudioLLM/SenseVoiceSmall".to_string())]
        );
        assert_eq!(
            form_fields(&opts, Some("zh")),
            vec![
                ("model", "FunAudioLLM/SenseVoiceSmall".to_string()),
                ("language", "zh".to_string()),
            ]
        );
        assert_eq!(form_fields(&opts, effective_language(None, "auto")).len(), 1);
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/transcriptions")
            .expect(0)
            .create_async()
            .await;

        let client = TranscriptionClient::new(reqwest::Client::new());
        let err = client
            .transcribe(FAKE_WAV, &options(&server.url(), ""), None)
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::MissingCredential);
        assert!(err.to_string().starts_with("STT"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn uploads_multipart_and_returns_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/transcriptions")
            .match_header("authorization", "Bearer sk-stt")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".into()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="recording.wav""#.into()),
                Matcher::Regex(r#"name="model"\r\n\r\nFunAudioLLM/SenseVoiceSmall"#.into()),
                Matcher::Regex(r#"name="language"\r\n\r\nzh"#.into()),
                Matcher::Regex("RIFF0000WAVEfmt data".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text": "明天开会"}"#)
            .create_async()
            .await;

        let client = TranscriptionClient::new(reqwest::Client::new());
        let text = client
            .transcribe(FAKE_WAV, &options(&server.url(), "sk-stt"), Some("zh"))
            .await
            .expect("success");

        assert_eq!(text, "明天开会");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_text_field_is_empty_string() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = TranscriptionClient::new(reqwest::Client::new());
        let text = client
            .transcribe(FAKE_WAV, &options(&server.url(), "sk-stt"), None)
            .await
            .expect("silence is not an error");
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn unauthorized_is_upstream_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .with_status(401)
            .with_body(r#"{"error": "invalid api key"}"#)
            .create_async()
            .await;

        let client = TranscriptionClient::new(reqwest::Client::new());
        let err = client
            .transcribe(FAKE_WAV, &options(&server.url(), "sk-bad"), None)
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::UpstreamError);
        assert_eq!(err.to_string(), r#"STT 401: {"error": "invalid api key"}"#);
    }

    #[tokio::test]
    async fn non_json_success_is_invalid_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body("plain text")
            .create_async()
            .await;

        let client = TranscriptionClient::new(reqwest::Client::new());
        let err = client
            .transcribe(FAKE_WAV, &options(&server.url(), "sk-stt"), None)
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let client = TranscriptionClient::new(reqwest::Client::new());
        let err = client
            .transcribe(FAKE_WAV, &options("http://127.0.0.1:1", "sk-stt"), None)
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::NetworkError);
    }
}
