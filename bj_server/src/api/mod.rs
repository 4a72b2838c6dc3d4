//! HTTP API for the blackjack server.
//!
//! The API is built with:
//! - **Axum**: async web framework for HTTP
//! - **Tower**: CORS middleware
//! - **Uuid**: v4 session identifiers
//!
//! # Modules
//!
//! - [`rounds`]: round lifecycle handlers (start, view, act, reset)
//! - [`sessions`]: in-process persisted session store
//!
//! # Endpoints
//!
//! ```text
//! GET    /health                          - Health check
//! POST   /api/v1/rounds                   - Start a round, returns session id
//! GET    /api/v1/rounds/{session_id}      - Current round view
//! POST   /api/v1/rounds/{session_id}/action - Apply hit/stand
//! DELETE /api/v1/rounds/{session_id}      - Reset the session
//! ```

pub mod rounds;
pub mod sessions;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use sessions::SessionStore;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; cheap due to the Arc wrapper.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/rounds", post(rounds::start_round))
        .route(
            "/rounds/{session_id}",
            get(rounds::get_round).delete(rounds::reset_round),
        )
        .route("/rounds/{session_id}/action", post(rounds::take_action));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": {
            "active_count": state.sessions.active_count(),
        },
    }))
}
