//! WhisperTranscriber -- speech-to-text over an OpenAI-compatible API.
//!
//! Uploads the recording as multipart form data to
//! `{base_url}/audio/transcriptions` and reads the `text` field of the JSON
//! response. Works with OpenAI, Groq, and self-hosted whisper servers such
//! as faster-whisper-server.

use std::time::Duration;

use medibridge_core::engine::Transcriber;
use medibridge_types::config::TranscriptionConfig;
use medibridge_types::error::EngineError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{build_client, check_status, request_error, trim_base_url};

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcriber backed by a whisper model behind an HTTP API.
///
/// The optional API key is a [`SecretString`] and only exposed when the
/// `Authorization` header is built.
pub struct WhisperTranscriber {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl WhisperTranscriber {
    pub fn new(config: &TranscriptionConfig, api_key: Option<SecretString>) -> Result<Self, EngineError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base_url(&config.base_url),
            model: config.model.clone(),
            api_key,
            timeout,
        })
    }

    fn url(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }
}

pub(crate) fn parse_transcription(body: &str) -> Result<String, EngineError> {
    serde_json::from_str::<TranscriptionResponse>(body)
        .map(|r| r.text)
        .map_err(|e| EngineError::Response(format!("failed to parse transcription: {e}")))
}

impl Transcriber for WhisperTranscriber {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn transcribe(&self, audio: &[u8]) -> Result<String, EngineError> {
        let file = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| EngineError::Request(format!("invalid multipart part: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", file);

        let mut request = self.client.post(self.url()).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;
        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| EngineError::Response(format!("failed to read body: {e}")))?;

        parse_transcription(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcription() {
        let text = parse_transcription(r#"{"text": "Mujhe dard hai"}"#).unwrap();
        assert_eq!(text, "Mujhe dard hai");
    }

    #[test]
    fn test_parse_transcription_ignores_extra_fields() {
        let body = r#"{"text": "Hello", "language": "english", "duration": 1.5}"#;
        assert_eq!(parse_transcription(body).unwrap(), "Hello");
    }

    #[test]
    fn test_parse_transcription_missing_text() {
        let err = parse_transcription(r#"{"error": "bad audio"}"#).unwrap_err();
        assert!(matches!(err, EngineError::Response(_)));
    }

    #[test]
    fn test_url_joins_base() {
        let config = TranscriptionConfig {
            base_url: "http://localhost:8000/v1/".to_string(),
            ..TranscriptionConfig::default()
        };
        let transcriber = WhisperTranscriber::new(&config, None).unwrap();
        assert_eq!(transcriber.url(), "http://localhost:8000/v1/audio/transcriptions");
    }
}
