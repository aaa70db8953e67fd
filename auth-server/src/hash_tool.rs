//! `hash-password` command: prints an Argon2id PHC string for seeding user rows.

use crate::config::{HashingConfig, Settings};
use auth_core::{Argon2Hasher, SecretHasher};
use log::error;
use tokio::io::AsyncReadExt;

pub const COMMAND: &str = "hash-password";

/// Hashes `secret`, or the first line of stdin when no secret is given.
/// Returns the process exit code.
pub async fn run(secret: Option<String>) -> i32 {
    let hashing = match Settings::hashing_from_env() {
        Ok(hashing) => hashing,
        Err(e) => {
            error!("Configuration error: {}", e);
            return 1;
        }
    };

    let secret = match secret {
        Some(secret) => secret,
        None => match read_stdin().await {
            Ok(secret) => secret,
            Err(e) => {
                error!("Failed to read secret from stdin: {}", e);
                return 1;
            }
        },
    };

    match hash_secret(&hashing, &secret) {
        Ok(hash) => {
            println!("{}", hash);
            0
        }
        Err(e) => {
            error!("Failed to hash secret: {}", e);
            1
        }
    }
}

fn hash_secret(hashing: &HashingConfig, secret: &str) -> Result<String, String> {
    if secret.is_empty() {
        return Err("secret must not be empty".to_string());
    }
    let hasher = Argon2Hasher::new(&hashing.argon2()).map_err(|e| e.to_string())?;
    hasher.hash(secret).map_err(|e| e.to_string())
}

async fn read_stdin() -> std::io::Result<String> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input.lines().next().unwrap_or_default().to_string())
}
