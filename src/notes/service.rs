//! Note Service - orchestration around the NoteRepository
//!
//! Applies input checks and timestamp policy, then delegates to the
//! repository. Errors from the repository are propagated unchanged.

use super::models::*;
use super::repository::NoteRepository;
use chrono::Utc;
use std::sync::Arc;

/// Service for note operations
pub struct NoteService {
    repository: Arc<dyn NoteRepository>,
}

impl NoteService {
    /// Create a new NoteService
    pub fn new(repository: Arc<dyn NoteRepository>) -> Self {
        Self { repository }
    }

    /// Access the underlying repository
    pub fn repository(&self) -> &Arc<dyn NoteRepository> {
        &self.repository
    }

    /// Persist a new note.
    ///
    /// `created_at` is stamped here; the repository may stamp it again.
    /// On success `note.id` holds the assigned identifier.
    pub async fn create(&self, note: &mut Note) -> Result<()> {
        if !note.id.is_empty() {
            return Err(NoteError::InvalidArgument(format!(
                "note {} has already been created",
                note.id
            )));
        }

        note.created_at = Utc::now();
        note.updated_at = note.updated_at.max(note.created_at);
        self.repository.create(note).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to create note");
        })?;

        tracing::debug!(note_id = %note.id, "Created note");
        Ok(())
    }

    /// Write a note's title, content and validity to the store.
    ///
    /// Does not check expiration: that rule belongs to [`Note::update`], which
    /// callers apply before reaching this point (see [`NoteService::revise`]).
    pub async fn update(&self, note: &Note) -> Result<()> {
        if note.id.is_empty() {
            return Err(NoteError::InvalidArgument(
                "cannot update a note without an id".to_string(),
            ));
        }

        self.repository.update(note).await.inspect_err(|e| {
            tracing::warn!(note_id = %note.id, error = %e, "Failed to update note");
        })?;

        tracing::debug!(note_id = %note.id, "Updated note");
        Ok(())
    }

    /// Load a stored note, apply a revision through the domain rule, and save it.
    ///
    /// Fails with `NotFound` if the note does not exist and with `Expired`
    /// if its validity window is over; the stored note is then left as is.
    pub async fn revise(&self, id: &NoteId, revision: NoteRevision) -> Result<Note> {
        let mut note = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| NoteError::NotFound(id.clone()))?;

        let title = revision.title.unwrap_or_else(|| note.title.clone());
        let content = revision.content.unwrap_or_else(|| note.content.clone());
        let valid_until = revision.valid_until.unwrap_or(note.valid_until);
        note.update(title, content, valid_until)?;

        self.update(&note).await?;
        Ok(note)
    }

    /// Delete a note, failing with `NotFound` if it does not exist
    pub async fn delete(&self, id: &NoteId) -> Result<()> {
        let note = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| NoteError::NotFound(id.clone()))?;

        self.repository.delete(&note.id).await?;

        tracing::debug!(note_id = %note.id, "Deleted note");
        Ok(())
    }

    /// Get a note by id
    pub async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>> {
        self.repository.find_by_id(id).await
    }

    /// List all notes
    pub async fn find_all(&self) -> Result<Vec<Note>> {
        self.repository.find_all().await
    }

    /// Delete all notes
    pub async fn delete_all(&self) -> Result<()> {
        self.repository.delete_all().await?;
        tracing::info!("Deleted all notes");
        Ok(())
    }
}
