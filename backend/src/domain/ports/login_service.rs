//! Driving ports for account use-cases: login and signup.
//!
//! Inbound adapters call these to authenticate or register users without
//! touching hashing or persistence, which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignupRequest, UserProjection};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user's projection.
    ///
    /// Unknown user names and wrong passwords fail with the same
    /// `unauthorized` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserProjection, Error>;
}

/// Domain use-case port for account registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Register a new user with an empty carousel collection.
    async fn signup(&self, request: &SignupRequest) -> Result<UserProjection, Error>;
}
