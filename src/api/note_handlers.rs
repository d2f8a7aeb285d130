//! API handlers for notes

use super::handlers::{AppError, NotesState};
use crate::notes::{Note, NoteId, NoteRevision};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a note
#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
    pub title: String,
    pub content: String,
    /// Defaults to now + the configured validity window
    pub valid_until: Option<DateTime<Utc>>,
}

/// Request to update a note
#[derive(Debug, Deserialize, Default)]
pub struct UpdateNoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CreateNoteResponse {
    pub message: String,
    pub id: NoteId,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    /// `null` when no note has the requested id
    pub note: Option<Note>,
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub notes: Vec<Note>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Reject a blank required text field
fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn require_id(id: &str) -> Result<NoteId, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("id cannot be empty".to_string()));
    }
    Ok(NoteId::from(id))
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new note
pub async fn create_note(
    State(state): State<NotesState>,
    body: Result<Json<CreateNoteBody>, JsonRejection>,
) -> Result<Json<CreateNoteResponse>, AppError> {
    let Json(body) = body?;
    require_text("title", &body.title)?;
    require_text("content", &body.content)?;

    let valid_until = match body.valid_until {
        Some(valid_until) => valid_until,
        None => Utc::now()
            .checked_add_signed(state.default_validity)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "default validity window of {} is out of range",
                    state.default_validity
                )
            })?,
    };
    let mut note = Note::new(body.title, body.content, valid_until);
    state.notes.create(&mut note).await?;

    Ok(Json(CreateNoteResponse {
        message: "Note created successfully".to_string(),
        id: note.id,
    }))
}

/// Get a note by ID
pub async fn get_note(
    State(state): State<NotesState>,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = state.notes.find_by_id(&NoteId::from(id)).await?;
    Ok(Json(NoteResponse { note }))
}

/// List all notes
pub async fn list_notes(State(state): State<NotesState>) -> Result<Json<NotesResponse>, AppError> {
    let notes = state.notes.find_all().await?;
    Ok(Json(NotesResponse { notes }))
}

/// Update a note. Omitted fields keep their stored value.
pub async fn update_note(
    State(state): State<NotesState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateNoteBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(body) = body?;
    let id = require_id(&id)?;
    if let Some(title) = &body.title {
        require_text("title", title)?;
    }
    if let Some(content) = &body.content {
        require_text("content", content)?;
    }

    let revision = NoteRevision {
        title: body.title,
        content: body.content,
        valid_until: body.valid_until,
    };
    if revision.is_empty() {
        return Err(AppError::BadRequest(
            "at least one of title, content or valid_until is required".to_string(),
        ));
    }
    state.notes.revise(&id, revision).await?;

    Ok(MessageResponse::new("Note updated successfully"))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<NotesState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.notes.delete(&NoteId::from(id)).await?;
    Ok(MessageResponse::new("Note deleted successfully"))
}

/// Delete all notes
pub async fn delete_all_notes(
    State(state): State<NotesState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.notes.delete_all().await?;
    Ok(MessageResponse::new("All notes deleted successfully"))
}
