//! MongoDB adapter integration tests
//!
//! These tests require MongoDB to be running (MONGO_URI, default localhost).
//! Each test works in its own collection, dropped again by `TestDb::cleanup`.
//! Run with: cargo test --test mongo_tests

use bson::{doc, Document};
use chrono::{Duration as ChronoDuration, Utc};
use notes_backend::mongo::{MongoSettings, MongoStore};
use notes_backend::notes::{Note, NoteError, NoteId, NoteRepository};
use std::time::Duration;
use uuid::Uuid;

/// Settings for a throwaway collection
fn test_settings() -> MongoSettings {
    MongoSettings {
        uri: std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into()),
        database: "notes_backend_test".into(),
        collection: format!("notes_{}", Uuid::new_v4().simple()),
        op_timeout: Duration::from_secs(2),
    }
}

/// A connected store plus raw access to its collection
struct TestDb {
    store: MongoStore,
    raw: mongodb::Collection<Document>,
}

impl TestDb {
    /// Connect, or None when MongoDB is not reachable
    async fn connect() -> Option<Self> {
        let settings = test_settings();
        let raw_client = mongodb::Client::with_uri_str(&settings.uri).await.ok()?;
        let raw = raw_client
            .database(&settings.database)
            .collection::<Document>(&settings.collection);

        match MongoStore::connect(settings).await {
            Ok(store) => Some(Self { store, raw }),
            Err(e) => {
                eprintln!("Skipping test: MongoDB not available ({:#})", e);
                None
            }
        }
    }

    /// Drop the collection and disconnect
    async fn cleanup(self) {
        let _ = self.raw.drop().await;
        self.store.shutdown().await;
    }
}

fn sample_note(title: &str) -> Note {
    Note::new(
        title.to_string(),
        format!("{} body", title),
        Utc::now() + ChronoDuration::hours(1),
    )
}

#[tokio::test]
async fn test_create_and_find_by_id() {
    let Some(db) = TestDb::connect().await else { return };
    let repo = db.store.note_repository();

    let mut note = sample_note("first");
    repo.create(&mut note).await.unwrap();
    assert_eq!(note.id.as_str().len(), 24);

    let found = repo.find_by_id(&note.id).await.unwrap().unwrap();
    assert_eq!(found.id, note.id);
    assert_eq!(found.title, "first");
    assert_eq!(found.content, "first body");
    // BSON datetimes keep millisecond precision
    assert_eq!(
        found.valid_until.timestamp_millis(),
        note.valid_until.timestamp_millis()
    );
    assert!(found.updated_at >= found.created_at);

    db.cleanup().await;
}

#[tokio::test]
async fn test_update_overlays_fields() {
    let Some(db) = TestDb::connect().await else { return };
    let repo = db.store.note_repository();

    let mut note = sample_note("before");
    repo.create(&mut note).await.unwrap();

    note.title = "after".into();
    note.content = "changed".into();
    repo.update(&note).await.unwrap();

    let found = repo.find_by_id(&note.id).await.unwrap().unwrap();
    assert_eq!(found.title, "after");
    assert_eq!(found.content, "changed");
    assert!(found.updated_at >= found.created_at);

    db.cleanup().await;
}

#[tokio::test]
async fn test_update_missing_note_is_not_found() {
    let Some(db) = TestDb::connect().await else { return };
    let repo = db.store.note_repository();

    let mut note = sample_note("ghost");
    note.id = NoteId::from("000000000000000000000000");
    let err = repo.update(&note).await.unwrap_err();
    assert!(matches!(err, NoteError::NotFound(_)));

    db.cleanup().await;
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let Some(db) = TestDb::connect().await else { return };
    let repo = db.store.note_repository();

    let mut note = sample_note("gone");
    repo.create(&mut note).await.unwrap();
    repo.delete(&note.id).await.unwrap();
    repo.delete(&note.id).await.unwrap();
    assert!(repo.find_by_id(&note.id).await.unwrap().is_none());

    db.cleanup().await;
}

#[tokio::test]
async fn test_malformed_id_is_reported() {
    let Some(db) = TestDb::connect().await else { return };
    let repo = db.store.note_repository();

    let err = repo
        .find_by_id(&NoteId::from("xyz"))
        .await
        .unwrap_err();
    assert!(matches!(err, NoteError::MalformedIdentifier(_)));

    db.cleanup().await;
}

#[tokio::test]
async fn test_delete_all_then_find_all_is_empty() {
    let Some(db) = TestDb::connect().await else { return };
    let repo = db.store.note_repository();

    for title in ["a", "b", "c"] {
        repo.create(&mut sample_note(title)).await.unwrap();
    }
    assert_eq!(repo.find_all().await.unwrap().len(), 3);

    repo.delete_all().await.unwrap();
    assert!(repo.find_all().await.unwrap().is_empty());
    assert!(repo.health_check().await.unwrap());

    db.cleanup().await;
}

#[tokio::test]
async fn test_find_all_fails_on_undecodable_document() {
    let Some(db) = TestDb::connect().await else { return };
    let repo = db.store.note_repository();

    repo.create(&mut sample_note("valid")).await.unwrap();
    db.raw
        .insert_one(doc! { "content": "stored without a title" })
        .await
        .unwrap();

    let err = repo.find_all().await.unwrap_err();
    assert!(matches!(err, NoteError::Store(_)), "got {:?}", err);

    db.cleanup().await;
}

#[tokio::test]
async fn test_connect_to_unreachable_host_fails() {
    let settings = MongoSettings {
        uri: "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200".into(),
        database: "unused".into(),
        collection: "unused".into(),
        op_timeout: Duration::from_secs(2),
    };
    assert!(MongoStore::connect(settings).await.is_err());
}
