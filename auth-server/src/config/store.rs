use serde::Deserialize;

/// Specifies which backing store holds the user records
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoreKind {
    #[default]
    InMemory,
    Redis,
}

/// Configuration for the credential store backend
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// Store type: "in-memory" (default) or "redis"
    #[serde(default)]
    pub kind: StoreKind,

    /// In-memory store specific configuration
    #[serde(default)]
    pub in_memory: InMemoryStoreConfig,

    /// Redis store specific configuration
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InMemoryStoreConfig {
    /// JSON file with an array of user rows loaded at startup
    #[serde(default)]
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection string
    #[serde(default)]
    pub url: String,

    /// Prefix of the per-username list keys (default: "user:")
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_key_prefix() -> String {
    "user:".to_string()
}
