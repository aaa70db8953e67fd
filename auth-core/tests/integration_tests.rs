use auth_core::{
    Argon2Config, Argon2Hasher, AuthError, CredentialStore, CredentialVerifier, FailureReason,
    InMemorySource, SecretHasher, StoreError, UserRecord,
};
use log::LevelFilter;
use std::collections::BTreeSet;

fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn hasher() -> Argon2Hasher {
    Argon2Hasher::new(&Argon2Config::testing()).expect("valid test parameters")
}

/// Store containing `{alice, hash("s3cret"), {"read"}}`
fn alice_verifier() -> CredentialVerifier<InMemorySource, Argon2Hasher> {
    let hash = hasher().hash("s3cret").expect("hashing succeeds");
    let alice = UserRecord::new("alice", hash, ["read"]).expect("valid record");
    let store = CredentialStore::new(InMemorySource::with_rows(vec![alice]));
    CredentialVerifier::new(store, hasher()).expect("verifier builds")
}

#[tokio::test]
async fn scenario_correct_secret_authenticates() {
    init_logger();
    let verifier = alice_verifier();

    let principal = verifier
        .authenticate("alice", "s3cret")
        .await
        .expect("alice authenticates");

    let (username, permissions) = principal.into_parts();
    assert_eq!(username, "alice");
    assert_eq!(permissions, BTreeSet::from(["read".to_string()]));
}

#[tokio::test]
async fn scenario_wrong_secret_is_rejected() {
    init_logger();
    let verifier = alice_verifier();

    let err = verifier.authenticate("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::Failed(f) if f.reason == FailureReason::BadSecret));
}

#[tokio::test]
async fn scenario_unknown_user_is_rejected() {
    init_logger();
    let verifier = alice_verifier();

    let err = verifier.authenticate("bob", "anything").await.unwrap_err();
    assert!(matches!(err, AuthError::Failed(f) if f.reason == FailureReason::UnknownUser));
}

#[tokio::test]
async fn scenario_empty_store_lookup_is_not_found() {
    init_logger();
    let store = CredentialStore::new(InMemorySource::new());

    assert_eq!(store.find_by_username("alice").await, Ok(None));
}

#[tokio::test]
async fn lookup_rejects_empty_username() {
    init_logger();
    let verifier = alice_verifier();

    let err = verifier.store().find_by_username("").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
}

#[tokio::test]
async fn seeded_duplicate_usernames_are_refused() {
    init_logger();
    let source = InMemorySource::new();
    let hash = hasher().hash("s3cret").unwrap();
    source
        .insert_row(UserRecord::new("alice", hash.clone(), ["read"]).unwrap())
        .await;
    source
        .insert_row(UserRecord::new("alice", hash, ["admin"]).unwrap())
        .await;
    let store = CredentialStore::new(source);

    let err = store.find_by_username("alice").await.unwrap_err();
    assert_eq!(
        err,
        StoreError::DataIntegrityViolation {
            username: "alice".to_string(),
            rows: 2
        }
    );
}

#[test]
fn encoded_password_verifies() {
    let hasher = hasher();
    let encoded = hasher.hash("admin").unwrap();

    assert!(encoded.starts_with("$argon2id$"));
    assert!(hasher.verify("admin", &encoded).unwrap());
    assert!(UserRecord::new("admin", encoded, ["admin"]).is_ok());
}
