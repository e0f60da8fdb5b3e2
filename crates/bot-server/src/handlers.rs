//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use bot_core::{IncomingEvent, Reply};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub profiles: usize,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub replies: Vec<Reply>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let profiles = state.store.get_profiles().await.len();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        profiles,
    })
}

/// Deliver one front-end event to the conversation machine
pub async fn post_event(
    State(state): State<AppState>,
    Json(payload): Json<IncomingEvent>,
) -> Result<Json<EventResponse>, (StatusCode, Json<ErrorResponse>)> {
    if payload.user_id.as_str().trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "user_id must not be empty".into(),
                code: "INVALID_USER".into(),
            }),
        ));
    }

    let replies = state.machine.handle(&payload.user_id, payload.event).await;
    Ok(Json(EventResponse { replies }))
}
