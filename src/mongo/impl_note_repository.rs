//! `NoteRepository` implementation for `MongoNoteRepository`.
//!
//! Every method simply delegates to the corresponding inherent method on `MongoNoteRepository`.

use async_trait::async_trait;

use super::client::MongoNoteRepository;
use crate::notes::{Note, NoteId, NoteRepository, Result};

#[async_trait]
impl NoteRepository for MongoNoteRepository {
    async fn create(&self, note: &mut Note) -> Result<()> {
        self.create(note).await
    }

    async fn update(&self, note: &Note) -> Result<()> {
        self.update(note).await
    }

    async fn delete(&self, id: &NoteId) -> Result<()> {
        self.delete(id).await
    }

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>> {
        self.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Note>> {
        self.find_all().await
    }

    async fn delete_all(&self) -> Result<()> {
        self.delete_all().await
    }

    async fn health_check(&self) -> Result<bool> {
        self.health_check().await
    }
}
