use async_trait::async_trait;
use auth_core::{StoreError, UserRecord, UserSource};
use log::error;
use redis::{aio::ConnectionManager, AsyncCommands, Client};

/// User rows stored in Redis.
///
/// Each username maps to a list at `{key_prefix}{username}` whose entries are
/// JSON encoded rows. A healthy store has at most one entry per list.
#[derive(Clone)]
pub struct RedisSource {
    _client: Client,
    conn_manager: ConnectionManager,
    key_prefix: String,
}

impl RedisSource {
    /// Connects to Redis and checks the connection with a PING
    pub async fn new(redis_url: &str, key_prefix: &str) -> Result<Self, String> {
        let client = match Client::open(redis_url) {
            Ok(client) => client,
            Err(err) => {
                return Err(format!("Failed to connect to Redis: {}", err));
            }
        };

        let conn_manager = match ConnectionManager::new(client.clone()).await {
            Ok(manager) => manager,
            Err(err) => {
                return Err(format!(
                    "Failed to create Redis connection manager: {}",
                    err
                ));
            }
        };

        let mut conn = conn_manager.clone();
        if let Err(err) = redis::cmd("PING").query_async::<String>(&mut conn).await {
            return Err(format!("Failed to ping Redis: {}", err));
        }

        Ok(Self {
            _client: client,
            conn_manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key(&self, username: &str) -> String {
        format!("{}{}", self.key_prefix, username)
    }

    /// Appends a row to the username's list
    #[cfg(test)]
    pub async fn insert_row(&self, record: &UserRecord) -> Result<(), StoreError> {
        let serialized =
            serde_json::to_string(record).map_err(|e| StoreError::Decode(e.to_string()))?;
        let key = self.key(record.username());
        let mut conn = self.conn_manager.clone();

        match conn.rpush::<_, _, ()>(&key, serialized).await {
            Ok(_) => Ok(()),
            Err(err) => {
                error!("Redis error while appending to key {}: {}", key, err);
                Err(StoreError::Backend(err.to_string()))
            }
        }
    }
}

#[async_trait]
impl UserSource for RedisSource {
    async fn select_by_username(&self, username: &str) -> Result<Vec<UserRecord>, StoreError> {
        let key = self.key(username);
        let mut conn = self.conn_manager.clone();

        // A missing key reads as an empty list
        let entries: Vec<String> = match conn.lrange(&key, 0, -1).await {
            Ok(entries) => entries,
            Err(err) => {
                error!("Redis error while reading key {}: {}", key, err);
                return Err(StoreError::Backend(err.to_string()));
            }
        };

        entries
            .iter()
            .map(|entry| {
                serde_json::from_str::<UserRecord>(entry).map_err(|e| {
                    error!("Undecodable row under key {}: {}", key, e);
                    StoreError::Decode(e.to_string())
                })
            })
            .collect()
    }

    async fn health_check(&self) -> Result<(), String> {
        let mut conn = self.conn_manager.clone();
        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => Ok(()),
            Err(err) => Err(format!("Redis health check failed: {}", err)),
        }
    }
}
