//! API route definitions

use super::handlers::{self, NotesState};
use super::note_handlers;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: NotesState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // ====================================================================
        // Notes
        // ====================================================================
        .route(
            "/notes",
            get(note_handlers::list_notes)
                .post(note_handlers::create_note)
                .delete(note_handlers::delete_all_notes),
        )
        .route(
            "/notes/{id}",
            get(note_handlers::get_note)
                .put(note_handlers::update_note)
                .delete(note_handlers::delete_note),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
