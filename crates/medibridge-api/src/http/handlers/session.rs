//! Live session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions                  - Start or resume a conversation
//! - GET    /api/v1/sessions/{id}             - Session state and display log
//! - DELETE /api/v1/sessions/{id}             - Drop a live session
//! - PUT    /api/v1/sessions/{id}/languages   - Change per-role languages
//! - POST   /api/v1/sessions/{id}/clear       - Empty the display log
//! - POST   /api/v1/sessions/{id}/turns/text  - Submit a typed turn
//! - POST   /api/v1/sessions/{id}/turns/audio - Submit a recorded turn (raw body)

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medibridge_core::conversation::session::ConversationSession;
use medibridge_core::turn::TurnOutcome;
use medibridge_types::conversation::{DisplayEntry, Message, TurnInput};
use medibridge_types::language::{Language, LanguageConfig, Role};

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::{AppState, SharedSession};

/// Body of `POST /sessions`. Every field is optional and the body itself
/// may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSessionRequest {
    /// Conversation to resume; a new one is created when absent.
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
    #[serde(default)]
    pub doctor_language: Option<Language>,
    #[serde(default)]
    pub patient_language: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct TextTurnRequest {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioTurnQuery {
    pub role: Role,
}

/// Session state as returned to clients.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub conversation_id: Uuid,
    pub languages: LanguageConfig,
    pub display_log: Vec<DisplayEntry>,
}

impl SessionView {
    fn new(session_id: Uuid, session: &ConversationSession) -> Self {
        Self {
            session_id,
            conversation_id: session.conversation_id(),
            languages: session.languages(),
            display_log: session.display_log().to_vec(),
        }
    }
}

/// Outcome of a submitted turn.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnView {
    Completed { message: Message },
    DuplicateAudio,
}

impl From<TurnOutcome> for TurnView {
    fn from(outcome: TurnOutcome) -> Self {
        match outcome {
            TurnOutcome::Completed(message) => TurnView::Completed { message },
            TurnOutcome::DuplicateAudio => TurnView::DuplicateAudio,
        }
    }
}

fn lookup(state: &AppState, session_id: &str) -> Result<(Uuid, SharedSession), AppError> {
    let id = parse_uuid(session_id)?;
    let session = state.sessions.get(&id).ok_or(AppError::SessionNotFound)?;
    Ok((id, session))
}

fn session_link(id: &Uuid) -> String {
    format!("/api/v1/sessions/{id}")
}

/// POST /api/v1/sessions - Start a new conversation or resume an existing one.
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let req = body.map(|Json(req)| req).unwrap_or_default();
    let defaults = state.config.languages;
    let languages = LanguageConfig {
        doctor: req.doctor_language.unwrap_or(defaults.doctor),
        patient: req.patient_language.unwrap_or(defaults.patient),
    };

    let session = state.open_session(req.conversation_id, Some(languages)).await?;
    let view_session = session.clone();
    let session_id = state.sessions.insert(session);

    let view = SessionView::new(session_id, &view_session);
    let resp = ApiResponse::success(view, request_id, start.elapsed().as_millis() as u64)
        .with_link("self", &session_link(&session_id))
        .with_link(
            "messages",
            &format!("/api/v1/conversations/{}/messages", view_session.conversation_id()),
        );
    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id} - Current languages and display log.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (id, shared) = lookup(&state, &session_id)?;
    let session = shared.lock().await;

    let resp = ApiResponse::success(
        SessionView::new(id, &session),
        request_id,
        start.elapsed().as_millis() as u64,
    )
    .with_link("self", &session_link(&id));
    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/{id} - Drop the live session (history is kept).
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&session_id)?;
    if !state.sessions.remove(&id) {
        return Err(AppError::SessionNotFound);
    }

    let resp = ApiResponse::success(
        serde_json::json!({ "deleted": true, "session_id": id }),
        request_id,
        start.elapsed().as_millis() as u64,
    );
    Ok(Json(resp))
}

/// PUT /api/v1/sessions/{id}/languages - Applies to turns submitted afterwards.
pub async fn set_languages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(languages): Json<LanguageConfig>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (id, shared) = lookup(&state, &session_id)?;
    let mut session = shared.lock().await;
    session.set_languages(languages);
    tracing::info!(
        session_id = %id,
        doctor = %languages.doctor,
        patient = %languages.patient,
        "Session languages changed"
    );

    let resp = ApiResponse::success(
        SessionView::new(id, &session),
        request_id,
        start.elapsed().as_millis() as u64,
    );
    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/clear - Empty the display log only.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (id, shared) = lookup(&state, &session_id)?;
    let mut session = shared.lock().await;
    session.clear();

    let resp = ApiResponse::success(
        SessionView::new(id, &session),
        request_id,
        start.elapsed().as_millis() as u64,
    );
    Ok(Json(resp))
}

/// Run a turn while holding the session lock so turns within one session
/// are processed strictly in order.
async fn submit(
    state: &AppState,
    session_id: &str,
    role: Role,
    input: TurnInput,
) -> Result<Json<ApiResponse<TurnView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (id, shared) = lookup(state, session_id)?;
    let mut session = shared.lock().await;
    let outcome = state
        .turn_processor
        .process_turn(&mut session, role, input)
        .await?;

    let resp = ApiResponse::success(
        TurnView::from(outcome),
        request_id,
        start.elapsed().as_millis() as u64,
    )
    .with_link("session", &session_link(&id));
    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/turns/text - `{ "role": "Doctor", "text": "..." }`.
pub async fn submit_text_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<TextTurnRequest>,
) -> Result<Json<ApiResponse<TurnView>>, AppError> {
    submit(&state, &session_id, req.role, TurnInput::Text(req.text)).await
}

/// POST /api/v1/sessions/{id}/turns/audio?role=Patient - raw audio bytes as body.
pub async fn submit_audio_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<AudioTurnQuery>,
    body: Bytes,
) -> Result<Json<ApiResponse<TurnView>>, AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("Audio body is empty".to_string()));
    }
    submit(&state, &session_id, query.role, TurnInput::Audio(body.to_vec())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_request_all_optional() {
        let req: CreateSessionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.conversation_id.is_none());
        assert!(req.doctor_language.is_none());

        let req: CreateSessionRequest =
            serde_json::from_str(r#"{"doctor_language": "de", "patient_language": "zh-CN"}"#)
                .unwrap();
        assert_eq!(req.doctor_language, Some(Language::German));
        assert_eq!(req.patient_language, Some(Language::ChineseSimplified));
    }

    #[test]
    fn test_create_session_request_resumes_conversation_id() {
        let id = Uuid::now_v7();
        let req: CreateSessionRequest =
            serde_json::from_str(&format!(r#"{{"conversation_id": "{id}"}}"#)).unwrap();
        assert_eq!(req.conversation_id, Some(id));
    }

    #[test]
    fn test_create_session_request_rejects_unknown_fields() {
        let id = Uuid::now_v7();
        let result =
            serde_json::from_str::<CreateSessionRequest>(&format!(r#"{{"resume": "{id}"}}"#));
        assert!(result.is_err());
    }

    #[test]
    fn test_text_turn_request_role() {
        let req: TextTurnRequest =
            serde_json::from_str(r#"{"role": "Patient", "text": "Mujhe dard hai"}"#).unwrap();
        assert_eq!(req.role, Role::Patient);
    }

    #[test]
    fn test_turn_view_serialization() {
        let json = serde_json::to_value(TurnView::DuplicateAudio).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "duplicate_audio" }));
    }
}
