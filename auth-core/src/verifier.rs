//! Credential Verifier
//!
//! Decides whether a presented secret matches the stored hash of a user and
//! produces an [`AuthenticatedPrincipal`] on success.

use crate::error::{AuthError, AuthenticationFailure, FailureReason, HashError};
use crate::hasher::SecretHasher;
use crate::model::AuthenticatedPrincipal;
use crate::store::{CredentialStore, UserSource};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use log::{debug, info, warn};
use std::sync::Arc;

/// Stateless password gate over a [`CredentialStore`].
///
/// Unknown usernames still pay for one full hash verification against a
/// decoy hash created at construction, so both failure paths cost the same
/// hashing work.
pub struct CredentialVerifier<S, H> {
    store: CredentialStore<S>,
    hasher: Arc<H>,
    decoy_hash: Arc<str>,
}

impl<S, H> Clone for CredentialVerifier<S, H> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            hasher: Arc::clone(&self.hasher),
            decoy_hash: Arc::clone(&self.decoy_hash),
        }
    }
}

impl<S: UserSource, H: SecretHasher> CredentialVerifier<S, H> {
    pub fn new(store: CredentialStore<S>, hasher: H) -> Result<Self, HashError> {
        let decoy_secret = SaltString::generate(&mut OsRng);
        let decoy_hash = hasher.hash(decoy_secret.as_str())?;

        Ok(Self {
            store,
            hasher: Arc::new(hasher),
            decoy_hash: Arc::from(decoy_hash),
        })
    }

    pub fn store(&self) -> &CredentialStore<S> {
        &self.store
    }

    pub async fn authenticate(
        &self,
        username: &str,
        presented_secret: &str,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let Some(record) = self.store.find_by_username(username).await? else {
            // Result deliberately ignored, only the hashing cost matters here
            let _ = self
                .verify_off_thread(presented_secret, self.decoy_hash.to_string())
                .await;
            return Err(self.reject(username, FailureReason::UnknownUser));
        };

        let matched = self
            .verify_off_thread(presented_secret, record.password_hash().to_string())
            .await?;
        if !matched {
            return Err(self.reject(username, FailureReason::BadSecret));
        }

        info!("User {:?} authenticated", record.username());
        Ok(AuthenticatedPrincipal::from_record(record))
    }

    fn reject(&self, username: &str, reason: FailureReason) -> AuthError {
        warn!("Authentication rejected for user {:?}", username);
        debug!("Rejection reason: {:?}", reason);
        AuthenticationFailure::new(reason).into()
    }

    /// Runs the hash comparison on the blocking pool.
    ///
    /// Dropping the returned future abandons the wait; the blocking task runs
    /// to completion and its result is discarded.
    async fn verify_off_thread(
        &self,
        secret: &str,
        stored_hash: String,
    ) -> Result<bool, HashError> {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &stored_hash))
            .await
            .map_err(|e| HashError::Task(e.to_string()))?
    }
}
