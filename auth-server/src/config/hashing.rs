use auth_core::Argon2Config;
use serde::Deserialize;

/// Argon2id cost and admission settings
#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    /// Memory cost in KiB (default: 19456)
    #[serde(default = "default_memory_cost")]
    pub memory_cost: u32,

    /// Iterations (default: 2)
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,

    /// Lanes (default: 1)
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,

    /// Maximum authentications hashing at the same time (default: 8)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_cost: default_memory_cost(),
            time_cost: default_time_cost(),
            parallelism: default_parallelism(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl HashingConfig {
    pub fn argon2(&self) -> Argon2Config {
        Argon2Config {
            memory_cost: self.memory_cost,
            time_cost: self.time_cost,
            parallelism: self.parallelism,
            ..Argon2Config::default()
        }
    }
}

fn default_memory_cost() -> u32 {
    Argon2Config::default().memory_cost
}

fn default_time_cost() -> u32 {
    Argon2Config::default().time_cost
}

fn default_parallelism() -> u32 {
    Argon2Config::default().parallelism
}

fn default_max_concurrent() -> usize {
    8
}
