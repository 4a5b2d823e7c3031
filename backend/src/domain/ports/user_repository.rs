//! Port abstraction for user document persistence and its errors.
//!
//! Adapters read and write the whole user document (credentials plus the
//! embedded carousel collection) in one call. There is no partial update and
//! no optimistic concurrency token: the last `save` wins.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Insert clashed with an existing user id or user name.
        Duplicate { message: String } => "user already exists: {message}",
        /// `save` targeted a user that is not stored.
        Missing { user_id: String } => "user {user_id} is not stored",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user document; fails with `Duplicate` when the id or the
    /// user name is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace an existing user document wholesale.
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by login name.
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, UserPersistenceError>;
}

/// Translate repository failures into API errors.
///
/// `Duplicate` and `Missing` are mapped here as a fallback only; use cases
/// that can hit them decide their own status first.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::Duplicate { message } => {
            tracing::warn!(constraint = %message, "unexpected duplicate user record");
            Error::conflict("user already exists")
        }
        UserPersistenceError::Missing { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
    }
}
