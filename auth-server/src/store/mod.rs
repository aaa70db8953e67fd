use crate::config::{Settings, StoreKind};
use auth_core::{InMemorySource, StoreError, UserRecord, UserSource};
use log::info;
use thiserror::Error;

pub mod redis;

/// Errors that can occur while setting up the credential store
#[derive(Debug, Error)]
pub enum StoreSetupError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to load seed file {path}: {reason}")]
    Seed { path: String, reason: String },
    #[error("Redis error: {0}")]
    Redis(String),
}

/// Backing store for user rows, chosen at startup from the configuration.
#[derive(Clone)]
pub enum Store {
    /// Rows held in process memory, optionally seeded from a JSON file
    InMemory(InMemorySource),
    /// Rows held in Redis lists keyed by username
    Redis(redis::RedisSource),
}

#[async_trait::async_trait]
impl UserSource for Store {
    async fn select_by_username(&self, username: &str) -> Result<Vec<UserRecord>, StoreError> {
        match self {
            Self::InMemory(source) => source.select_by_username(username).await,
            Self::Redis(source) => source.select_by_username(username).await,
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        match self {
            Self::InMemory(source) => source.health_check().await,
            Self::Redis(source) => source.health_check().await,
        }
    }
}

/// Creates the store selected by `settings.store.kind`
pub async fn create_store(settings: &Settings) -> Result<Store, StoreSetupError> {
    match settings.store.kind {
        StoreKind::InMemory => {
            let rows = match &settings.store.in_memory.seed_file {
                Some(path) => load_seed_file(path).await?,
                None => Vec::new(),
            };
            info!("Using in-memory credential store with {} rows", rows.len());
            Ok(Store::InMemory(InMemorySource::with_rows(rows)))
        }
        StoreKind::Redis => {
            if settings.store.redis.url.is_empty() {
                return Err(StoreSetupError::Config(
                    "Redis URL is required when using the redis store".to_string(),
                ));
            }
            let source =
                redis::RedisSource::new(&settings.store.redis.url, &settings.store.redis.key_prefix)
                    .await
                    .map_err(StoreSetupError::Redis)?;
            info!("Using redis credential store");
            Ok(Store::Redis(source))
        }
    }
}

/// Reads a JSON array of user rows. Every row must carry a valid hash.
async fn load_seed_file(path: &str) -> Result<Vec<UserRecord>, StoreSetupError> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| StoreSetupError::Seed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    serde_json::from_slice(&contents).map_err(|e| StoreSetupError::Seed {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
