//! HTTP API for notes

pub mod handlers;
pub mod note_handlers;
pub mod routes;

pub use handlers::{AppError, NotesState, ServerState};
pub use routes::create_router;
