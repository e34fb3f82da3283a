//! Summary HTTP handler.
//!
//! Endpoint (mounted only when summarization is enabled):
//! - POST /api/v1/conversations/{id}/summary - Generate a clinical summary

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub conversation_id: Uuid,
    pub summary: String,
}

/// POST /api/v1/conversations/{id}/summary - Not persisted; generated per request.
pub async fn summarize_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ApiResponse<SummaryView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&conversation_id)?;
    // The route is only mounted with a summarizer; a missing one means the
    // state was built without it.
    let summarizer = state
        .summarizer
        .as_ref()
        .ok_or_else(|| AppError::Validation("Summarization is disabled".to_string()))?;
    let summary = summarizer.summarize(&id).await?;

    let resp = ApiResponse::success(
        SummaryView {
            conversation_id: id,
            summary,
        },
        request_id,
        start.elapsed().as_millis() as u64,
    )
    .with_link("messages", &format!("/api/v1/conversations/{id}/messages"));
    Ok(Json(resp))
}
