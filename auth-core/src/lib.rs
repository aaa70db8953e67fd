//! # auth-core
//!
//! Credential lookup and verification for an authorization service.
//!
//! ## Components
//!
//! - **Store:** [`CredentialStore`] resolves a username to at most one
//!   [`UserRecord`] through a pluggable [`UserSource`].
//! - **Hasher:** [`SecretHasher`] hashes and verifies secrets;
//!   [`Argon2Hasher`] is the Argon2id implementation.
//! - **Verifier:** [`CredentialVerifier`] checks a presented secret against
//!   the stored hash and yields an [`AuthenticatedPrincipal`].
//!
//! Collaborators are passed in explicitly:
//!
//! ```no_run
//! use auth_core::{
//!     Argon2Config, Argon2Hasher, CredentialStore, CredentialVerifier, InMemorySource,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CredentialStore::new(InMemorySource::new());
//! let hasher = Argon2Hasher::new(&Argon2Config::default())?;
//! let verifier = CredentialVerifier::new(store, hasher)?;
//! let principal = verifier.authenticate("alice", "s3cret").await?;
//! println!("{} may {:?}", principal.username(), principal.permissions());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod hasher;
pub mod model;
pub mod store;
pub mod verifier;

pub use error::{AuthError, AuthenticationFailure, FailureReason, HashError, ModelError, StoreError};
pub use hasher::{Argon2Config, Argon2Hasher, SecretHasher};
pub use model::{AuthenticatedPrincipal, UserRecord};
pub use store::memory::InMemorySource;
pub use store::{CredentialStore, UserSource};
pub use verifier::CredentialVerifier;
