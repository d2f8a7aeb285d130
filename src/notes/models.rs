//! Note domain model
//!
//! Defines the `Note` entity, its identifier and the single business rule:
//! an expired note can no longer be edited.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result alias for note operations
pub type Result<T, E = NoteError> = std::result::Result<T, E>;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised by the note domain, service and persistence layers
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    /// Input rejected before reaching the store
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The note is past its validity window and cannot be modified
    #[error("cannot update expired note {id} (valid until {valid_until})")]
    Expired {
        id: NoteId,
        valid_until: DateTime<Utc>,
    },

    /// The identifier cannot be decoded to the store's native form
    #[error("malformed note identifier: {0:?}")]
    MalformedIdentifier(String),

    /// No note with this identifier exists
    #[error("note not found: {0}")]
    NotFound(NoteId),

    /// Underlying store failure
    #[error("store error: {0:#}")]
    Store(anyhow::Error),

    /// A store operation exceeded its time bound
    #[error("store operation `{operation}` timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl NoteError {
    /// Whether this error originates from the store (connectivity, driver, timeout)
    pub fn is_store_error(&self) -> bool {
        matches!(self, NoteError::Store(_) | NoteError::Timeout { .. })
    }
}

// ============================================================================
// Identifier
// ============================================================================

/// Opaque note identifier.
///
/// Empty until the note has been persisted. The store decides the encoding;
/// the domain only ever sees a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// Note
// ============================================================================

/// A short-lived text note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier (empty until created)
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// End of the editable lifetime
    pub valid_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Reserved for soft-delete, never set
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Create a new, not yet persisted note
    pub fn new(title: String, content: String, valid_until: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::default(),
            title,
            content,
            valid_until,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Whether the validity window is over at `now`.
    ///
    /// A note whose `valid_until` equals `now` is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    /// Overwrite title, content and validity, refreshing `updated_at`.
    ///
    /// Fails with [`NoteError::Expired`] once the note is past `valid_until`,
    /// leaving the note untouched.
    pub fn update(
        &mut self,
        title: String,
        content: String,
        valid_until: DateTime<Utc>,
    ) -> Result<()> {
        self.update_as_of(title, content, valid_until, Utc::now())
    }

    /// Same as [`Note::update`], evaluated at the given instant.
    ///
    /// `updated_at` strictly increases: when `now` is not past the previous
    /// stamp, the stamp advances by one nanosecond instead.
    pub fn update_as_of(
        &mut self,
        title: String,
        content: String,
        valid_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.is_expired_at(now) {
            return Err(NoteError::Expired {
                id: self.id.clone(),
                valid_until: self.valid_until,
            });
        }
        self.title = title;
        self.content = content;
        self.valid_until = valid_until;
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + ChronoDuration::nanoseconds(1)
        };
        Ok(())
    }
}

/// Partial changes applied to a stored note.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteRevision {
    pub title: Option<String>,
    pub content: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl NoteRevision {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.valid_until.is_none()
    }
}
