use std::time::Duration;

use thiserror::Error;

/// Errors from conversation store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conversation store unavailable: {0}")]
    Unavailable(String),

    #[error("conversation not found")]
    NotFound,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors from an opaque external engine (transcription, translation,
/// summarization).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Response(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors that abandon a turn. Nothing is persisted or displayed when one
/// of these is returned.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("message text is empty")]
    EmptyInput,

    #[error("transcription failed: {0}")]
    TranscriptionFailed(EngineError),

    #[error("translation failed: {0}")]
    TranslationFailed(EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from conversation summarization.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summarization failed: {0}")]
    SummarizationFailed(EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("pool timed out".to_string());
        assert_eq!(err.to_string(), "conversation store unavailable: pool timed out");
    }

    #[test]
    fn test_turn_error_wraps_engine_error() {
        let err = TurnError::TranslationFailed(EngineError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.to_string(), "translation failed: timed out after 30s");
    }

    #[test]
    fn test_turn_error_from_store_error_is_transparent() {
        let err: TurnError = StoreError::NotFound.into();
        assert_eq!(err.to_string(), "conversation not found");
    }

    #[test]
    fn test_summary_error_display() {
        let err = SummaryError::SummarizationFailed(EngineError::Status {
            status: 500,
            body: "model not loaded".to_string(),
        });
        assert!(err.to_string().contains("HTTP 500"));
        assert!(err.to_string().contains("model not loaded"));
    }
}
