//! Opaque engine abstractions: speech-to-text, translation, summarization.
//!
//! Each engine is a black box with a single call. Concrete HTTP clients live
//! in medibridge-infra. Callers bound every call with [`with_timeout`] so a
//! hung engine surfaces as an error instead of stalling the session.

use std::future::Future;
use std::time::Duration;

use medibridge_types::error::EngineError;
use medibridge_types::language::LanguagePair;

/// Speech-to-text engine: audio bytes in, plain text out.
pub trait Transcriber: Send + Sync {
    /// Engine name for logs (e.g., "whisper").
    fn name(&self) -> &str;

    /// Transcribe a recording.
    fn transcribe(
        &self,
        audio: &[u8],
    ) -> impl Future<Output = Result<String, EngineError>> + Send;
}

/// Translation engine: text plus a language pair in, translated text out.
pub trait Translator: Send + Sync {
    /// Engine name for logs (e.g., "google").
    fn name(&self) -> &str;

    /// Translate `text` from `pair.source` to `pair.target`.
    fn translate(
        &self,
        text: &str,
        pair: LanguagePair,
    ) -> impl Future<Output = Result<String, EngineError>> + Send;
}

/// Summarization engine: a single prompt in, the model's text response out.
pub trait SummaryEngine: Send + Sync {
    /// Engine name for logs (e.g., "ollama").
    fn name(&self) -> &str;

    /// Submit a prompt and return the response text.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, EngineError>> + Send;
}

/// Run an engine call with an upper bound on its duration.
///
/// An elapsed deadline becomes `EngineError::Timeout`; the in-flight call is
/// dropped.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, EngineError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(EngineError::Timeout(limit)),
    }
}
