//! MongoDB store for notes

pub mod client;
mod impl_note_repository;
pub mod models;

pub use client::{MongoNoteRepository, MongoSettings, MongoStore};
pub use models::NoteDocument;
