//! Account use-cases: signup and password login.
//!
//! Passwords are hashed through the [`PasswordHasher`] port and users are
//! stored through the [`UserRepository`] port. Every login failure that could
//! reveal whether a user name exists collapses into the same `unauthorized`
//! error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, SignupService, UserPersistenceError,
    UserRepository, map_user_persistence_error,
};
use crate::domain::{Error, LoginCredentials, SignupRequest, User, UserProjection};

/// Message returned for every failed login.
pub const LOGIN_FAILED_MESSAGE: &str = "incorrect username or password";

/// Answer to a signup whose id or name collided at insert time.
pub const SIGNUP_TAKEN_MESSAGE: &str = "user id or user name is already taken";

/// Account service implementing the login and signup driving ports.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Create a service over a user store and a password hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

#[async_trait]
impl SignupService for AccountService {
    async fn signup(&self, request: &SignupRequest) -> Result<UserProjection, Error> {
        let credentials = request.credentials();
        let taken = self
            .users
            .find_by_user_name(credentials.user_name())
            .await
            .map_err(map_user_persistence_error)?;
        if taken.is_some() {
            return Err(Error::invalid_request("user name is already taken"));
        }

        let hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;
        let user = User::new(request.id().clone(), credentials.user_name().clone(), hash);

        match self.users.insert(&user).await {
            Ok(()) => {}
            Err(UserPersistenceError::Duplicate { message }) => {
                warn!(
                    user_id = %user.id(),
                    constraint = %message,
                    "signup collided with an existing user"
                );
                return Err(Error::invalid_request(SIGNUP_TAKEN_MESSAGE));
            }
            Err(other) => return Err(map_user_persistence_error(other)),
        }

        info!(user_id = %user.id(), "user signed up");
        Ok(user.projection())
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserProjection, Error> {
        let Some(user) = self
            .users
            .find_by_user_name(credentials.user_name())
            .await
            .map_err(map_user_persistence_error)?
        else {
            warn!(user_name = %credentials.user_name(), "login for unknown user name");
            return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
        };

        let matches = match self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
        {
            Ok(matches) => matches,
            Err(PasswordHashError::MalformedHash { message }) => {
                warn!(user_id = %user.id(), %message, "stored password hash is unreadable");
                false
            }
            Err(other) => return Err(map_hash_error(other)),
        };

        if !matches {
            warn!(user_id = %user.id(), "login with wrong password");
            return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
        }

        info!(user_id = %user.id(), "user logged in");
        Ok(user.projection())
    }
}
