//! Notes Backend
//!
//! A small HTTP service for short-lived text notes:
//! - Notes carry a validity window and can no longer be edited once expired
//! - MongoDB persistence behind the `NoteRepository` trait
//! - JSON REST API served with axum

pub mod api;
pub mod mongo;
pub mod notes;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub mongo: MongoYamlConfig,
    pub notes: NotesYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// MongoDB configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoYamlConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub op_timeout_secs: u64,
}

impl Default for MongoYamlConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".into(),
            database: "notes_app".into(),
            collection: "notes".into(),
            op_timeout_secs: 10,
        }
    }
}

/// Notes configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotesYamlConfig {
    /// Validity window for notes created without `valid_until`
    pub default_validity_secs: u64,
}

impl Default for NotesYamlConfig {
    fn default() -> Self {
        Self {
            default_validity_secs: 86_400, // 24 hours
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub mongo_collection: String,
    pub mongo_op_timeout_secs: u64,
    pub default_validity_secs: u64,
}

/// Upper bound for `notes.default_validity_secs` (100 years)
pub const MAX_DEFAULT_VALIDITY_SECS: u64 = 100 * 365 * 86_400;

/// Parse a numeric env var, ignoring unset or unparsable values
fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let config = Self {
            server_port: env_number("PORT").unwrap_or(yaml.server.port),
            mongo_uri: std::env::var("MONGO_URI").unwrap_or(yaml.mongo.uri),
            mongo_database: std::env::var("MONGO_DB_NAME").unwrap_or(yaml.mongo.database),
            mongo_collection: std::env::var("MONGO_COLLECTION_NAME")
                .unwrap_or(yaml.mongo.collection),
            mongo_op_timeout_secs: env_number("MONGO_OP_TIMEOUT_SECS")
                .unwrap_or(yaml.mongo.op_timeout_secs),
            default_validity_secs: env_number("NOTES_DEFAULT_VALIDITY_SECS")
                .unwrap_or(yaml.notes.default_validity_secs),
        };

        if config.mongo_op_timeout_secs == 0 {
            anyhow::bail!("mongo.op_timeout_secs must be greater than zero");
        }
        if config.default_validity_secs > MAX_DEFAULT_VALIDITY_SECS {
            anyhow::bail!(
                "notes.default_validity_secs must not exceed {} (got {})",
                MAX_DEFAULT_VALIDITY_SECS,
                config.default_validity_secs
            );
        }
        Ok(config)
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }

    /// Connection settings for the note store
    pub fn mongo_settings(&self) -> mongo::MongoSettings {
        mongo::MongoSettings {
            uri: self.mongo_uri.clone(),
            database: self.mongo_database.clone(),
            collection: self.mongo_collection.clone(),
            op_timeout: Duration::from_secs(self.mongo_op_timeout_secs),
        }
    }

    /// Validity window applied to notes created without `valid_until`.
    ///
    /// Values above [`MAX_DEFAULT_VALIDITY_SECS`] are clamped to it.
    pub fn default_validity(&self) -> chrono::Duration {
        let secs = self.default_validity_secs.min(MAX_DEFAULT_VALIDITY_SECS) as i64;
        chrono::Duration::seconds(secs)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<notes::NoteService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the note service on top of a repository
    pub fn new(config: Config, repository: Arc<dyn notes::NoteRepository>) -> Self {
        Self {
            notes: Arc::new(notes::NoteService::new(repository)),
            config: Arc::new(config),
        }
    }

    /// State handed to the HTTP router
    pub fn server_state(&self) -> api::NotesState {
        Arc::new(api::ServerState {
            notes: self.notes.clone(),
            default_validity: self.config.default_validity(),
        })
    }
}

/// Connect to the store, serve the API until shutdown, then disconnect.
///
/// The store is released exactly once, whether the server stops cleanly or fails.
pub async fn start_server(config: Config) -> Result<()> {
    let store = mongo::MongoStore::connect(config.mongo_settings()).await?;

    let result = serve(config, &store).await;
    store.shutdown().await;
    result
}

async fn serve(config: Config, store: &mongo::MongoStore) -> Result<()> {
    let port = config.server_port;
    let state = AppState::new(config, Arc::new(store.note_repository()));
    let router = api::create_router(state.server_state());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

// ============================================================================
// Tests
// ============================================================================
