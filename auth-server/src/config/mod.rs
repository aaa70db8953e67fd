pub(crate) use crate::config::hashing::HashingConfig;
pub(crate) use crate::config::store::{StoreConfig, StoreKind};
use ::config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;

pub mod hashing;
pub mod store;

const ENV_PREFIX: &str = "AUTH";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// The port the server will listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// API Key callers must present - mandatory for all /v1 calls
    pub api_key: String,

    /// Upper bound for a single authentication, including waiting for a hashing slot
    #[serde(default = "default_authenticate_timeout_secs")]
    pub authenticate_timeout_secs: u64,

    /// Timeout for backing store health checks
    #[serde(default = "default_healthcheck_timeout_secs")]
    pub healthcheck_timeout_secs: u64,

    /// Credential store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Password hashing configuration
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// Subset of the settings needed by the `hash-password` command
#[derive(Debug, Deserialize)]
struct HashingOnly {
    #[serde(default)]
    hashing: HashingConfig,
}

fn default_port() -> u16 {
    8180
}

fn default_authenticate_timeout_secs() -> u64 {
    10
}

fn default_healthcheck_timeout_secs() -> u64 {
    3
}

fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl Settings {
    /// Loads settings from `AUTH_*` environment variables and validates them
    pub fn new() -> Result<Self, String> {
        let settings: Settings = Config::builder()
            .add_source(environment())
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads only the hashing section, no API key required
    pub fn hashing_from_env() -> Result<HashingConfig, String> {
        let only: HashingOnly = Config::builder()
            .add_source(environment())
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())?;
        Ok(only.hashing)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("api_key cannot be empty".to_string());
        }
        if self.authenticate_timeout_secs == 0 {
            return Err("authenticate_timeout_secs must be greater than 0".to_string());
        }
        if self.healthcheck_timeout_secs == 0 {
            return Err("healthcheck_timeout_secs must be greater than 0".to_string());
        }
        if self.hashing.max_concurrent == 0 {
            return Err("hashing.max_concurrent must be greater than 0".to_string());
        }
        if self.store.kind == StoreKind::Redis && self.store.redis.url.is_empty() {
            return Err("store.redis.url is required for the redis store".to_string());
        }
        Ok(())
    }

    pub fn authenticate_timeout(&self) -> Duration {
        Duration::from_secs(self.authenticate_timeout_secs)
    }

    pub fn healthcheck_timeout(&self) -> Duration {
        Duration::from_secs(self.healthcheck_timeout_secs)
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        Self {
            port: 0, // Let the OS choose a port
            api_key: "test_api_key".to_string(),
            authenticate_timeout_secs: 10,
            healthcheck_timeout_secs: 1,
            store: StoreConfig::default(),
            hashing: HashingConfig {
                memory_cost: 4096,
                time_cost: 1,
                parallelism: 1,
                max_concurrent: 4,
            },
        }
    }
}
