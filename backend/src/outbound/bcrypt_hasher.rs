//! `PasswordHasher` backed by bcrypt.
//!
//! bcrypt is deliberately slow, so both hashing and verification run on the
//! blocking thread pool.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// bcrypt adapter with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Build a hasher with the given cost.
    ///
    /// # Errors
    ///
    /// Returns `PasswordHashError::Hash` when `cost` is outside bcrypt's
    /// supported range (4..=31).
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(4..=31).contains(&cost) {
            return Err(PasswordHashError::hash(format!(
                "bcrypt cost must be between 4 and 31, got {cost}"
            )));
        }
        Ok(Self { cost })
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

fn join_error(err: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::worker(err.to_string())
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        let encoded = tokio::task::spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(PasswordHash::from_encoded(encoded))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_encoded().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password.as_bytes(), &encoded))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3)]
    #[case(32)]
    fn rejects_out_of_range_costs(#[case] cost: u32) {
        assert!(BcryptPasswordHasher::new(cost).is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_are_salted_and_verifiable() {
        let hasher = BcryptPasswordHasher::new(4).expect("cost");
        let first = hasher.hash("pw").await.expect("hash");
        let second = hasher.hash("pw").await.expect("hash");

        assert_ne!(first.as_encoded(), second.as_encoded());
        assert!(first.as_encoded().starts_with("$2"));
        assert!(hasher.verify("pw", &first).await.expect("verify"));
        assert!(!hasher.verify("nope", &first).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn unreadable_hashes_are_reported() {
        let hasher = BcryptPasswordHasher::new(4).expect("cost");
        let err = hasher
            .verify("pw", &PasswordHash::from_encoded("not-bcrypt"))
            .await
            .expect_err("malformed");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }
}
