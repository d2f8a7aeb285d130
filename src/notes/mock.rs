//! In-memory mock implementation of NoteRepository for testing.
//!
//! Notes live in a `tokio::sync::RwLock<HashMap<NoteId, Note>>`; ids are
//! random UUIDs in simple (hex) form. Conditionally compiled with `#[cfg(test)]`.

use super::models::{Note, NoteError, NoteId, Result};
use super::repository::NoteRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory mock implementation of NoteRepository for testing.
pub struct MockNoteRepository {
    pub notes: RwLock<HashMap<NoteId, Note>>,
    /// When set, every operation fails with a store error
    pub unavailable: AtomicBool,
}

impl MockNoteRepository {
    /// Create a new empty MockNoteRepository.
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulate a store outage (or recovery)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a note as-is, assigning an id when it has none
    pub async fn seed(&self, mut note: Note) -> Note {
        if note.id.is_empty() {
            note.id = NoteId::new(Uuid::new_v4().simple().to_string());
        }
        self.notes.write().await.insert(note.id.clone(), note.clone());
        note
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NoteError::Store(anyhow::anyhow!("mock store unavailable")));
        }
        Ok(())
    }
}

impl Default for MockNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn create(&self, note: &mut Note) -> Result<()> {
        self.check_available()?;
        note.created_at = Utc::now();
        note.updated_at = note.updated_at.max(note.created_at);
        note.id = NoteId::new(Uuid::new_v4().simple().to_string());
        self.notes.write().await.insert(note.id.clone(), note.clone());
        Ok(())
    }

    async fn update(&self, note: &Note) -> Result<()> {
        self.check_available()?;
        let mut notes = self.notes.write().await;
        let existing = notes
            .get_mut(&note.id)
            .ok_or_else(|| NoteError::NotFound(note.id.clone()))?;
        existing.title = note.title.clone();
        existing.content = note.content.clone();
        existing.valid_until = note.valid_until;
        existing.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<()> {
        self.check_available()?;
        self.notes.write().await.remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>> {
        self.check_available()?;
        Ok(self.notes.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Note>> {
        self.check_available()?;
        Ok(self.notes.read().await.values().cloned().collect())
    }

    async fn delete_all(&self) -> Result<()> {
        self.check_available()?;
        self.notes.write().await.clear();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn test_create_assigns_id_and_find_returns_it() {
        let repo = MockNoteRepository::new();
        let mut note = test_note();

        repo.create(&mut note).await.unwrap();
        assert!(!note.id.is_empty());

        let found = repo.find_by_id(&note.id).await.unwrap().unwrap();
        assert_eq!(found, note);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_idempotent() {
        let repo = MockNoteRepository::new();
        assert!(repo.delete(&NoteId::from("does-not-exist")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let repo = MockNoteRepository::new();
        let mut note = test_note();
        note.id = NoteId::from("missing");

        let err = repo.update(&note).await.unwrap_err();
        assert!(matches!(err, NoteError::NotFound(id) if id.as_str() == "missing"));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_with_store_error() {
        let repo = MockNoteRepository::new();
        repo.set_unavailable(true);

        let err = repo.find_all().await.unwrap_err();
        assert!(err.is_store_error());
        assert!(!repo.health_check().await.unwrap());
    }
}
