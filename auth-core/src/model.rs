use crate::error::ModelError;
use argon2::PasswordHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user row as held by the backing store.
///
/// `password_hash` always holds a PHC hash string with a salt and a hash
/// output. Plaintext secrets are rejected at construction and when
/// deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUserRecord")]
pub struct UserRecord {
    username: String,
    password_hash: String,
    permissions: BTreeSet<String>,
}

/// Wire shape of a row before the hash invariant is checked
#[derive(Deserialize)]
struct RawUserRecord {
    username: String,
    password_hash: String,
    #[serde(default)]
    permissions: BTreeSet<String>,
}

impl TryFrom<RawUserRecord> for UserRecord {
    type Error = ModelError;

    fn try_from(raw: RawUserRecord) -> Result<Self, Self::Error> {
        UserRecord::new(raw.username, raw.password_hash, raw.permissions)
    }
}

impl UserRecord {
    pub fn new<I, P>(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        permissions: I,
    ) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let username = username.into();
        if username.is_empty() {
            return Err(ModelError::EmptyUsername);
        }

        let password_hash = password_hash.into();
        ensure_phc_hash(&password_hash)?;

        Ok(Self {
            username,
            password_hash,
            permissions: permissions.into_iter().map(Into::into).collect(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }
}

fn ensure_phc_hash(candidate: &str) -> Result<(), ModelError> {
    let parsed = PasswordHash::new(candidate).map_err(|e| ModelError::NotAHash(e.to_string()))?;
    if parsed.salt.is_none() {
        return Err(ModelError::NotAHash("missing salt".to_string()));
    }
    if parsed.hash.is_none() {
        return Err(ModelError::NotAHash("missing hash output".to_string()));
    }
    Ok(())
}

/// The identity handed back to the caller after a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    username: String,
    permissions: BTreeSet<String>,
}

impl AuthenticatedPrincipal {
    pub(crate) fn from_record(record: UserRecord) -> Self {
        Self {
            username: record.username,
            permissions: record.permissions,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn into_parts(self) -> (String, BTreeSet<String>) {
        (self.username, self.permissions)
    }
}
