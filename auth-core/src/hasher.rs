//! Password hashing collaborator
//!
//! [`SecretHasher`] is the seam the verifier hashes through. [`Argon2Hasher`]
//! is the production implementation (Argon2id, PHC string output).

use crate::error::HashError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use log::{debug, warn};
use subtle::ConstantTimeEq;

/// One-way, salted, deliberately slow secret hashing.
///
/// Implementations are CPU-bound and may take tens of milliseconds per call;
/// async callers should run them on a blocking thread.
pub trait SecretHasher: Send + Sync + 'static {
    /// Hash `secret` under a freshly generated salt
    fn hash(&self, secret: &str) -> Result<String, HashError>;

    /// Check `secret` against `stored_hash`.
    ///
    /// Returns `Ok(false)` on mismatch. The final comparison must run in time
    /// independent of where the first differing byte is.
    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, HashError>;
}

/// Argon2id cost parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argon2Config {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations) (default: 2)
    pub time_cost: u32,
    /// Parallelism (default: 1)
    pub parallelism: u32,
    /// Output hash length in bytes (default: 32)
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
            output_len: Params::DEFAULT_OUTPUT_LEN,
        }
    }
}

impl Argon2Config {
    /// Low-cost parameters for tests (fast, not for production)
    pub fn testing() -> Self {
        Self {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            output_len: 32,
        }
    }

    fn to_params(&self) -> Result<Params, HashError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_len),
        )
        .map_err(|e| HashError::Hashing(format!("Invalid Argon2 parameters: {}", e)))
    }
}

#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl Argon2Hasher {
    pub fn new(config: &Argon2Config) -> Result<Self, HashError> {
        let params = config.to_params()?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?;

        debug!("Secret hashed successfully");
        Ok(hash.to_string())
    }

    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, HashError> {
        let stored =
            PasswordHash::new(stored_hash).map_err(|e| HashError::MalformedHash(e.to_string()))?;

        // Only hashes made with the configured cost are verified, so every
        // verification costs the same as the decoy used for unknown users.
        let params =
            Params::try_from(&stored).map_err(|e| HashError::MalformedHash(e.to_string()))?;
        if !self.matches_configuration(&stored, &params) {
            warn!(
                "Stored hash uses {} {:?} with {:?}, configured {:?}; rehash required",
                stored.algorithm,
                stored.version,
                params,
                self.argon2.params()
            );
            return Err(HashError::ParameterMismatch(format!(
                "stored hash uses {} m={},t={},p={}",
                stored.algorithm,
                params.m_cost(),
                params.t_cost(),
                params.p_cost()
            )));
        }

        let expected = stored
            .hash
            .ok_or_else(|| HashError::MalformedHash("missing hash output".to_string()))?;
        let salt = stored
            .salt
            .ok_or_else(|| HashError::MalformedHash("missing salt".to_string()))?;
        let computed = self
            .argon2
            .hash_password_customized(
                secret.as_bytes(),
                Some(stored.algorithm),
                stored.version,
                params,
                salt,
            )
            .map_err(|e| HashError::Hashing(e.to_string()))?;
        let actual = computed
            .hash
            .ok_or_else(|| HashError::Hashing("hasher produced no output".to_string()))?;

        Ok(constant_time_eq(actual.as_bytes(), expected.as_bytes()))
    }
}

impl Argon2Hasher {
    fn matches_configuration(&self, stored: &PasswordHash<'_>, params: &Params) -> bool {
        let configured = self.argon2.params();
        stored.algorithm == Algorithm::Argon2id.ident()
            && stored.version == Some(Version::V0x13 as u32)
            && params.m_cost() == configured.m_cost()
            && params.t_cost() == configured.t_cost()
            && params.p_cost() == configured.p_cost()
            && params.output_len() == configured.output_len()
    }
}

/// Byte-slice equality whose running time depends only on the lengths
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    bool::from(a.ct_eq(b))
}
