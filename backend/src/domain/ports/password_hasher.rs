//! Port for salted one-way password hashing.
//!
//! Hashing is CPU bound; adapters must keep it off the async executor.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing or verifying a password.
    pub enum PasswordHashError {
        /// The hashing backend rejected the input or its parameters.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
        /// The blocking worker running the hash was cancelled or panicked.
        Worker { message: String } => "password hashing worker failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a freshly salted hash of `password`.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against a stored hash.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}

/// Reversible stand-in for tests that do not care about hashing cost.
///
/// The "hash" is the password behind a `fixture$` prefix. Never wire this
/// into a running server.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::from_encoded(format!("{FIXTURE_PREFIX}{password}")))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let stored = hash
            .as_encoded()
            .strip_prefix(FIXTURE_PREFIX)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing fixture prefix"))?;
        Ok(stored == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_hasher_verifies_its_own_output() {
        let hasher = FixturePasswordHasher;
        let hash = hasher.hash("pw").await.expect("hash");
        assert!(hasher.verify("pw", &hash).await.expect("verify"));
        assert!(!hasher.verify("PW", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_hasher_rejects_foreign_hashes() {
        let foreign = PasswordHash::from_encoded("$2b$10$whatever");
        let err = FixturePasswordHasher
            .verify("pw", &foreign)
            .await
            .expect_err("foreign hash");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }
}
