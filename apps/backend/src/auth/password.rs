use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tokio::sync::Semaphore;
use tracing::error;

use super::AuthError;

/// Argon2id PHC string for `password`, with a fresh random salt and default cost.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::FatalConfiguration(format!("password hashing failed: {e}")))
}

/// Constant-time check of `password` against a stored PHC string.
/// Malformed hashes verify as `false`.
pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Runs hashing on the blocking pool, at most `concurrency` at a time.
#[derive(Clone, Debug)]
pub struct CredentialVerifier {
    permits: Arc<Semaphore>,
}

impl CredentialVerifier {
    pub fn new(concurrency: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub async fn hash(&self, password: String) -> Result<String, AuthError> {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AuthError::FatalConfiguration(format!("hash pool closed: {e}")))?;

        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::FatalConfiguration(format!("hash task failed: {e}")))?
    }

    pub async fn verify(&self, hash: String, password: String) -> bool {
        let Ok(_permit) = self.permits.clone().acquire_owned().await else {
            error!("Password verification pool closed");
            return false;
        };

        match tokio::task::spawn_blocking(move || verify_password(&hash, &password)).await {
            Ok(matched) => matched,
            Err(e) => {
                error!(error = %e, "Password verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "secret1"));
        assert!(!verify_password(&hash, "secret2"));
        assert!(!verify_password(&hash, ""));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password(&a, "secret1"));
        assert!(verify_password(&b, "secret1"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("", "secret1"));
        assert!(!verify_password("not-a-phc-string", "secret1"));
        assert!(!verify_password("$argon2id$v=19$broken", "secret1"));
    }

    #[tokio::test]
    async fn verifier_runs_on_blocking_pool() {
        let verifier = CredentialVerifier::new(1);
        let hash = verifier.hash("correct horse".to_string()).await.unwrap();
        assert!(verifier.verify(hash.clone(), "correct horse".to_string()).await);
        assert!(!verifier.verify(hash, "battery staple".to_string()).await);
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped() {
        let verifier = CredentialVerifier::new(0);
        assert!(verifier.hash("pw1234".to_string()).await.is_ok());
    }
}
