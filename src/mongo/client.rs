//! MongoDB client for note persistence

use super::models::*;
use crate::notes::{Note, NoteError, NoteId, Result};
use anyhow::Context;
use bson::doc;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::future::IntoFuture;
use std::time::Duration;

/// Connection parameters for the note store
#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Upper bound for every single store operation
    pub op_timeout: Duration,
}

/// Long-lived handle on the MongoDB deployment.
///
/// Created once at startup and released with [`MongoStore::shutdown`].
pub struct MongoStore {
    client: Client,
    settings: MongoSettings,
}

impl MongoStore {
    /// Connect and verify connectivity with a `ping`.
    ///
    /// If the ping fails the client is shut down before the error is returned.
    pub async fn connect(settings: MongoSettings) -> anyhow::Result<Self> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .context("Invalid MongoDB connection string")?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options).context("Failed to create MongoDB client")?;

        let ping = run_bounded(
            "ping",
            settings.op_timeout,
            client.database("admin").run_command(doc! { "ping": 1 }),
        )
        .await;
        if let Err(e) = ping {
            client.shutdown().await;
            return Err(anyhow::Error::new(e).context("Failed to ping MongoDB"));
        }

        tracing::info!(
            database = %settings.database,
            collection = %settings.collection,
            "Connected to MongoDB"
        );
        Ok(Self { client, settings })
    }

    /// Repository bound to the configured database and collection
    pub fn note_repository(&self) -> MongoNoteRepository {
        let collection = self
            .client
            .database(&self.settings.database)
            .collection::<NoteDocument>(&self.settings.collection);
        MongoNoteRepository {
            client: self.client.clone(),
            collection,
            op_timeout: self.settings.op_timeout,
        }
    }

    /// Close all connections
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("Disconnected from MongoDB");
    }
}

/// Run a single store operation under a time bound.
///
/// Driver errors become `NoteError::Store`, elapsed time `NoteError::Timeout`.
pub async fn run_bounded<T, E, F>(operation: &'static str, after: Duration, fut: F) -> Result<T>
where
    F: IntoFuture<Output = std::result::Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    match tokio::time::timeout(after, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(NoteError::Store(
            anyhow::Error::new(e).context(format!("MongoDB {} failed", operation)),
        )),
        Err(_) => Err(NoteError::Timeout { operation, after }),
    }
}

/// Note persistence backed by a MongoDB collection
#[derive(Clone)]
pub struct MongoNoteRepository {
    client: Client,
    collection: Collection<NoteDocument>,
    op_timeout: Duration,
}

impl MongoNoteRepository {
    /// Insert a new note and back-fill its generated id
    pub async fn create(&self, note: &mut Note) -> Result<()> {
        note.created_at = Utc::now();
        note.updated_at = note.updated_at.max(note.created_at);
        let doc = NoteDocument::from_note(note)?;

        let result = run_bounded(
            "insert_one",
            self.op_timeout,
            self.collection.insert_one(&doc),
        )
        .await?;

        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            NoteError::Store(anyhow::anyhow!(
                "Inserted id is not an ObjectId: {}",
                result.inserted_id
            ))
        })?;
        note.id = note_id_from_object_id(&oid);
        Ok(())
    }

    /// Replace title, content and validity of an existing note
    pub async fn update(&self, note: &Note) -> Result<()> {
        let oid = parse_object_id(&note.id)?;
        let filter = doc! { "_id": oid };

        let mut existing = run_bounded(
            "find_one",
            self.op_timeout,
            self.collection.find_one(filter.clone()),
        )
        .await?
        .ok_or_else(|| NoteError::NotFound(note.id.clone()))?;

        existing.merge_from(note, Utc::now());

        let result = run_bounded(
            "replace_one",
            self.op_timeout,
            self.collection.replace_one(filter, &existing),
        )
        .await?;
        if result.matched_count == 0 {
            return Err(NoteError::NotFound(note.id.clone()));
        }
        Ok(())
    }

    /// Delete a note by id (no error if absent)
    pub async fn delete(&self, id: &NoteId) -> Result<()> {
        let oid = parse_object_id(id)?;
        run_bounded(
            "delete_one",
            self.op_timeout,
            self.collection.delete_one(doc! { "_id": oid }),
        )
        .await?;
        Ok(())
    }

    /// Delete every note in the collection
    pub async fn delete_all(&self) -> Result<()> {
        let result = run_bounded(
            "delete_many",
            self.op_timeout,
            self.collection.delete_many(doc! {}),
        )
        .await?;
        tracing::debug!(deleted = result.deleted_count, "Cleared notes collection");
        Ok(())
    }

    /// Get a note by id
    pub async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>> {
        let oid = parse_object_id(id)?;
        let doc = run_bounded(
            "find_one",
            self.op_timeout,
            self.collection.find_one(doc! { "_id": oid }),
        )
        .await?;
        Ok(doc.map(NoteDocument::into_note))
    }

    /// Get all notes. A document that fails to decode aborts the whole listing.
    pub async fn find_all(&self) -> Result<Vec<Note>> {
        let docs = run_bounded("find", self.op_timeout, async {
            let mut cursor = self.collection.find(doc! {}).await?;
            let mut docs = Vec::new();
            while let Some(doc) = cursor.try_next().await? {
                docs.push(doc);
            }
            Ok::<_, mongodb::error::Error>(docs)
        })
        .await?;

        Ok(docs.into_iter().map(NoteDocument::into_note).collect())
    }

    /// Ping the deployment
    pub async fn health_check(&self) -> Result<bool> {
        let reply = run_bounded(
            "ping",
            self.op_timeout,
            self.client
                .database("admin")
                .run_command(doc! { "ping": 1 }),
        )
        .await;
        match reply {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "MongoDB health check failed");
                Ok(false)
            }
        }
    }
}
