//! Shared API state, health check and error handling

use crate::notes::{NoteError, NoteService};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub notes: Arc<NoteService>,
    /// Validity window given to notes created without an explicit `valid_until`
    pub default_validity: chrono::Duration,
}

/// Shared notes API state
pub type NotesState = Arc<ServerState>;

// ============================================================================
// Health check
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Health check handler: verifies connectivity to the note store.
///
/// Returns 200 + `"ok"` when the store answers, 503 + `"unhealthy"` otherwise.
pub async fn health(State(state): State<NotesState>) -> (StatusCode, Json<HealthResponse>) {
    let store_ok = state
        .notes
        .repository()
        .health_check()
        .await
        .unwrap_or(false);

    let (http_status, status, store) = if store_ok {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: store.to_string(),
        }),
    )
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// Every service failure is a server error; request validation happens in handlers.
impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
