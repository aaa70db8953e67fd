//! Credential Store
//!
//! [`CredentialStore`] resolves a username to at most one [`UserRecord`]
//! through a [`UserSource`], the backing-store collaborator.

pub mod memory;

use crate::error::StoreError;
use crate::model::UserRecord;
use async_trait::async_trait;
use log::{debug, error};
use std::sync::Arc;

/// Backing-store collaborator.
///
/// Equivalent to "select the rows where username equals X". Implementations
/// return every matching row and leave uniqueness checks to
/// [`CredentialStore`]. Connectivity failures are reported as
/// [`StoreError::Backend`] and are not retried by the store.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn select_by_username(&self, username: &str) -> Result<Vec<UserRecord>, StoreError>;

    /// Checks connectivity to the backing store
    async fn health_check(&self) -> Result<(), String>;
}

#[async_trait]
impl<S: UserSource + ?Sized> UserSource for Arc<S> {
    async fn select_by_username(&self, username: &str) -> Result<Vec<UserRecord>, StoreError> {
        (**self).select_by_username(username).await
    }

    async fn health_check(&self) -> Result<(), String> {
        (**self).health_check().await
    }
}

/// Read-only lookup of user records by unique username.
///
/// Every call reads the backing store; nothing is cached between calls.
pub struct CredentialStore<S> {
    source: Arc<S>,
}

impl<S> Clone for CredentialStore<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: UserSource> CredentialStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_shared(source: Arc<S>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the record whose username equals `username` byte for byte,
    /// `Ok(None)` when there is none.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        if username.is_empty() {
            return Err(StoreError::InvalidArgument(
                "username must not be empty".to_string(),
            ));
        }

        let mut rows: Vec<UserRecord> = self
            .source
            .select_by_username(username)
            .await?
            .into_iter()
            .filter(|row| row.username() == username)
            .collect();

        match rows.len() {
            0 => {
                debug!("No user record found");
                Ok(None)
            }
            1 => Ok(rows.pop()),
            count => {
                error!(
                    "Backing store holds {} records for one username, refusing to pick one",
                    count
                );
                Err(StoreError::DataIntegrityViolation {
                    username: username.to_string(),
                    rows: count,
                })
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), String> {
        self.source.health_check().await
    }
}
