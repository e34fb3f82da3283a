//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, tracing.
//! The summary route exists only when the state carries a summarizer.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Upper bound on a recorded turn uploaded as a raw body.
const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api_routes = Router::new()
        // Live sessions
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route(
            "/sessions/{id}/languages",
            put(handlers::session::set_languages),
        )
        .route("/sessions/{id}/clear", post(handlers::session::clear_session))
        .route(
            "/sessions/{id}/turns/text",
            post(handlers::session::submit_text_turn),
        )
        .route(
            "/sessions/{id}/turns/audio",
            post(handlers::session::submit_audio_turn).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        // Stored history
        .route(
            "/conversations",
            get(handlers::conversation::list_conversations),
        )
        .route(
            "/conversations/{id}/messages",
            get(handlers::conversation::get_messages),
        );

    if state.summarizer.is_some() {
        api_routes = api_routes.route(
            "/conversations/{id}/summary",
            post(handlers::summary::summarize_conversation),
        );
    }

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness and capability check.
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "summarization": state.summarizer.is_some(),
        "live_sessions": state.sessions.len(),
    }))
}
