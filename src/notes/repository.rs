//! NoteRepository trait definition
//!
//! Abstract persistence contract consumed by `NoteService`. Implementations
//! own the mapping to a concrete store; nothing here knows about one.

use super::models::{Note, NoteId, Result};
use async_trait::async_trait;

/// Persistence operations for notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Persist a new note and write the store-assigned id back into `note.id`
    async fn create(&self, note: &mut Note) -> Result<()>;

    /// Overwrite the mutable fields of an existing note.
    ///
    /// Fails with `NoteError::NotFound` when no note has this id.
    async fn update(&self, note: &Note) -> Result<()>;

    /// Remove a note. Deleting an unknown id is not an error.
    async fn delete(&self, id: &NoteId) -> Result<()>;

    /// Get a note by id, `None` when it does not exist
    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>>;

    /// List every stored note, in no particular order
    async fn find_all(&self) -> Result<Vec<Note>>;

    /// Remove every note
    async fn delete_all(&self) -> Result<()>;

    /// Check that the store is reachable
    async fn health_check(&self) -> Result<bool>;
}
