use std::fmt;
use thiserror::Error;

/// Errors raised while constructing a [`crate::model::UserRecord`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Password hash is not a PHC hash string: {0}")]
    NotAHash(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing store returned more than one row for a unique username.
    #[error("Data integrity violation: {rows} records share username {username:?}")]
    DataIntegrityViolation { username: String, rows: usize },

    #[error("Backing store error: {0}")]
    Backend(String),

    #[error("Failed to decode user record: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// The stored hash was made with a different algorithm or cost than configured.
    #[error("Password hash parameters differ from the configured ones: {0}")]
    ParameterMismatch(String),

    #[error("Hashing task failed: {0}")]
    Task(String),
}

/// Why an authentication attempt was rejected.
///
/// Only in-process callers can see this. Both reasons render the same
/// message through [`AuthenticationFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    UnknownUser,
    BadSecret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationFailure {
    pub reason: FailureReason,
}

impl AuthenticationFailure {
    pub(crate) fn new(reason: FailureReason) -> Self {
        Self { reason }
    }
}

impl fmt::Display for AuthenticationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid username or password")
    }
}

impl std::error::Error for AuthenticationFailure {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Failed(#[from] AuthenticationFailure),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

impl AuthError {
    /// Returns the rejection reason if this is an authentication failure
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            AuthError::Failed(failure) => Some(failure.reason),
            _ => None,
        }
    }
}
