//! Notes module
//!
//! Short-lived text notes with a validity window: an expired note can still be
//! read or deleted, but no longer edited.
//!
//! The service talks to storage only through the [`NoteRepository`] trait.

pub mod models;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod mock;

pub use models::*;
pub use repository::NoteRepository;
pub use service::NoteService;
