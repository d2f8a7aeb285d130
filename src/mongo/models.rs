//! MongoDB document model for notes
//!
//! Maps the domain `Note` to the stored BSON shape and translates the domain's
//! hex string id to and from the store's `ObjectId`.

use crate::notes::{Note, NoteError, NoteId, Result};
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored representation of a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "valid_until_at", with = "chrono_datetime_as_bson_datetime")]
    pub valid_until: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<bson::DateTime>,
}

/// Decode a domain id into an `ObjectId`.
///
/// Anything other than 24 hex characters is a `MalformedIdentifier`.
pub fn parse_object_id(id: &NoteId) -> Result<ObjectId> {
    ObjectId::parse_str(id.as_str())
        .map_err(|_| NoteError::MalformedIdentifier(id.as_str().to_string()))
}

/// Encode an `ObjectId` as a domain id
pub fn note_id_from_object_id(oid: &ObjectId) -> NoteId {
    NoteId::new(oid.to_hex())
}

impl NoteDocument {
    /// Build the stored document for a note. An empty id leaves `_id` unset.
    pub fn from_note(note: &Note) -> Result<Self> {
        let id = if note.id.is_empty() {
            None
        } else {
            Some(parse_object_id(&note.id)?)
        };

        Ok(Self {
            id,
            title: note.title.clone(),
            content: note.content.clone(),
            created_at: note.created_at,
            updated_at: note.updated_at,
            valid_until: note.valid_until,
            deleted_at: note.deleted_at.map(bson::DateTime::from_chrono),
        })
    }

    /// Convert back to the domain model
    pub fn into_note(self) -> Note {
        Note {
            id: self
                .id
                .as_ref()
                .map(note_id_from_object_id)
                .unwrap_or_default(),
            title: self.title,
            content: self.content,
            valid_until: self.valid_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at.map(|d| d.to_chrono()),
        }
    }

    /// Overlay the editable fields of `note` and stamp `updated_at`
    pub fn merge_from(&mut self, note: &Note, now: DateTime<Utc>) {
        self.title = note.title.clone();
        self.content = note.content.clone();
        self.valid_until = note.valid_until;
        self.updated_at = now;
    }
}
