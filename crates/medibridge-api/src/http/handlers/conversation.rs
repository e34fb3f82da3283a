//! Conversation history HTTP handlers.
//!
//! Endpoints:
//! - GET /api/v1/conversations                - List conversations, newest first
//! - GET /api/v1/conversations/{id}/messages  - Messages in store order

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use medibridge_core::conversation::repository::ConversationStore;
use medibridge_types::conversation::{Conversation, Message};

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/conversations - All conversations, newest first.
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let conversations = state.store.list_conversations().await?;

    let resp = ApiResponse::success(conversations, request_id, start.elapsed().as_millis() as u64)
        .with_link("self", "/api/v1/conversations");
    Ok(Json(resp))
}

/// GET /api/v1/conversations/{id}/messages - Unknown ids yield an empty list.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&conversation_id)?;
    let messages = state.store.load_messages(&id).await?;

    let resp = ApiResponse::success(messages, request_id, start.elapsed().as_millis() as u64)
        .with_link("self", &format!("/api/v1/conversations/{id}/messages"));
    Ok(Json(resp))
}
