//! Argon2id password hashing.
//!
//! Hashing is CPU bound, so both operations run on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// `CredentialHasher` producing PHC strings with default Argon2id parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a hasher.
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(password: &str) -> Result<String, CredentialHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHasherError::hash(err.to_string()))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, CredentialHasherError> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialHasherError::hash(err.to_string())),
    }
}

fn join_error(err: &tokio::task::JoinError) -> CredentialHasherError {
    CredentialHasherError::hash(format!("hashing task aborted: {err}"))
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, CredentialHasherError> {
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(|err| join_error(&err))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHasherError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
            .await
            .map_err(|err| join_error(&err))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_only_the_original_password() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("Str0ng!pass").await.expect("hash");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Str0ng!pass", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong!Pass1", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn salts_differ_between_hashes() {
        let hasher = Argon2Hasher::new();
        let first = hasher.hash("Str0ng!pass").await.expect("hash");
        let second = hasher.hash("Str0ng!pass").await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hashes_are_reported() {
        let err = Argon2Hasher::new()
            .verify("Str0ng!pass", "$2b$12$not-a-phc-string")
            .await
            .expect_err("malformed");
        assert!(matches!(err, CredentialHasherError::MalformedHash { .. }));
    }
}
