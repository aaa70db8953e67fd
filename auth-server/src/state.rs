use crate::config::Settings;
use crate::store::Store;
use auth_core::{Argon2Hasher, CredentialStore, CredentialVerifier, HashError, UserSource};
use log::warn;
use std::sync::Arc;
use tokio::sync::Semaphore;

pub type Verifier = CredentialVerifier<Store, Argon2Hasher>;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub verifier: Verifier,
    /// Bounds the number of authentications hashing at the same time
    pub hash_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(settings: &Settings, store: Store) -> Result<Self, HashError> {
        let hasher = Argon2Hasher::new(&settings.hashing.argon2())?;
        let verifier = CredentialVerifier::new(CredentialStore::new(store), hasher)?;
        Ok(Self {
            settings: Arc::new(settings.clone()),
            verifier,
            hash_permits: Arc::new(Semaphore::new(settings.hashing.max_concurrent)),
        })
    }

    pub fn store(&self) -> &CredentialStore<Store> {
        self.verifier.store()
    }

    /// Checks the backing store within the configured health check timeout
    pub async fn health_check(&self) -> Result<(), String> {
        let timeout = self.settings.healthcheck_timeout();
        match tokio::time::timeout(timeout, self.store().source().health_check()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                warn!("Credential store health check failed: {}", e);
                Err(e)
            }
            Err(_) => {
                warn!("Credential store health check timed out after {:?}", timeout);
                Err(format!("health check timed out after {:?}", timeout))
            }
        }
    }
}
