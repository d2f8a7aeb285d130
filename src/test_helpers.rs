//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating test notes with sensible defaults,
//! and helpers for building mock AppState / ServerState instances.
#![allow(dead_code)]

use crate::api::NotesState;
use crate::notes::mock::MockNoteRepository;
use crate::notes::Note;
use crate::{AppState, Config};
use chrono::{Duration, Utc};
use std::sync::Arc;

// ============================================================================
// Mock state builders
// ============================================================================

/// Config pointing at a mock store
pub fn mock_config() -> Config {
    Config {
        server_port: 0,
        mongo_uri: "mongodb://mock:27017".to_string(),
        mongo_database: "notes_mock".to_string(),
        mongo_collection: "notes".to_string(),
        mongo_op_timeout_secs: 10,
        default_validity_secs: 86_400,
    }
}

/// Create a mock AppState with an empty in-memory repository
pub fn mock_app_state() -> (AppState, Arc<MockNoteRepository>) {
    let repo = Arc::new(MockNoteRepository::new());
    (AppState::new(mock_config(), repo.clone()), repo)
}

/// Create the router state over an empty in-memory repository
pub fn mock_server_state() -> (NotesState, Arc<MockNoteRepository>) {
    let (state, repo) = mock_app_state();
    (state.server_state(), repo)
}

// ============================================================================
// Test data factories
// ============================================================================

/// Create an unsaved note valid for the next hour
pub fn test_note() -> Note {
    Note::new(
        "Groceries".to_string(),
        "Milk, eggs, bread".to_string(),
        Utc::now() + Duration::hours(1),
    )
}

/// Create an unsaved note with a specific title
pub fn test_note_titled(title: &str) -> Note {
    Note::new(
        title.to_string(),
        format!("Content of {}", title),
        Utc::now() + Duration::hours(1),
    )
}

/// Create an unsaved note whose validity window ended a minute ago
pub fn expired_note() -> Note {
    let mut note = Note::new(
        "Old".to_string(),
        "Past its window".to_string(),
        Utc::now() - Duration::minutes(1),
    );
    note.created_at -= Duration::hours(2);
    note.updated_at = note.created_at;
    note
}
