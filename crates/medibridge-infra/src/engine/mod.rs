//! HTTP clients for the opaque engines.
//!
//! - `whisper`: OpenAI-compatible `/audio/transcriptions` speech-to-text
//! - `google`: Google Translate `translate_a/single` endpoint
//! - `ollama`: local Ollama `/api/chat` for clinical summaries
//!
//! Every client maps transport failures to `EngineError::Request`, non-2xx
//! responses to `EngineError::Status` and unparseable bodies to
//! `EngineError::Response`.

pub mod google;
pub mod ollama;
pub mod whisper;

use std::time::Duration;

use medibridge_types::error::EngineError;

pub use google::GoogleTranslator;
pub use ollama::OllamaSummaryEngine;
pub use whisper::WhisperTranscriber;

/// Build a reqwest client whose own timeout backs up the caller's deadline.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, EngineError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("medibridge/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| EngineError::Request(format!("failed to create HTTP client: {e}")))
}

/// Map a transport-level failure.
pub(crate) fn request_error(e: reqwest::Error, timeout: Duration) -> EngineError {
    if e.is_timeout() {
        EngineError::Timeout(timeout)
    } else {
        EngineError::Request(format!("HTTP request failed: {e}"))
    }
}

/// Pass successful responses through, turn anything else into `Status`.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, EngineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(EngineError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Strip a trailing slash so paths can be appended with `format!`.
pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
