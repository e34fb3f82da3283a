//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use medibridge_types::error::{EngineError, StoreError, SummaryError, TurnError};

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Turn(TurnError),
    Summary(SummaryError),
    Store(StoreError),
    /// No live session with this id.
    SessionNotFound,
    Validation(String),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl From<SummaryError> for AppError {
    fn from(e: SummaryError) -> Self {
        AppError::Summary(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

fn store_status(e: &StoreError) -> (StatusCode, &'static str) {
    match e {
        StoreError::NotFound => (StatusCode::NOT_FOUND, "CONVERSATION_NOT_FOUND"),
        StoreError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
        StoreError::Query(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
    }
}

fn engine_status(e: &EngineError) -> StatusCode {
    match e {
        EngineError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Turn(TurnError::EmptyInput) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Turn(TurnError::TranscriptionFailed(e)) => {
                (engine_status(e), "TRANSCRIPTION_FAILED")
            }
            AppError::Turn(TurnError::TranslationFailed(e)) => {
                (engine_status(e), "TRANSLATION_FAILED")
            }
            AppError::Turn(TurnError::Store(e)) => store_status(e),
            AppError::Summary(SummaryError::SummarizationFailed(e)) => {
                (engine_status(e), "SUMMARIZATION_FAILED")
            }
            AppError::Summary(SummaryError::Store(e)) => store_status(e),
            AppError::Store(e) => store_status(e),
            AppError::SessionNotFound => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Turn(e) => e.to_string(),
            AppError::Summary(e) => e.to_string(),
            AppError::Store(e) => e.to_string(),
            AppError::SessionNotFound => "Session not found".to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();
        if status.is_server_error() {
            tracing::warn!(code, error = %message, "Request failed");
        }

        let body = ApiResponse::error(code, &message, Uuid::now_v7().to_string());
        (status, Json(body)).into_response()
    }
}
