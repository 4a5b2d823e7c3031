//! Port for server-held session state.
//!
//! The cookie only carries an opaque key; the state map lives behind this
//! port. Expiry is an absolute timestamp managed by the store, and callers
//! pass `now` so adapters never read the wall clock themselves.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;

/// Session key/value state as kept by the session middleware.
pub type SessionState = HashMap<String, String>;

define_port_error! {
    /// Failures raised by session store adapters.
    pub enum SessionStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session store query failed: {message}",
        /// Stored state could not be encoded or decoded.
        Serialization { message: String } => "session state is not valid JSON: {message}",
        /// Insert clashed with an existing key.
        DuplicateKey => "session key already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load the state stored under `key`, treating rows expired at `now` as
    /// absent.
    async fn load(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionState>, SessionStoreError>;

    /// Store state under a new key.
    async fn insert(
        &self,
        key: &str,
        state: &SessionState,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionStoreError>;

    /// Overwrite state under an existing key. Returns `false` when the key is
    /// unknown, so the caller can fall back to issuing a new key.
    async fn update(
        &self,
        key: &str,
        state: &SessionState,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, SessionStoreError>;

    /// Move the expiry of an existing key.
    async fn touch(&self, key: &str, expires_at: DateTime<Utc>) -> Result<(), SessionStoreError>;

    /// Remove a key. Unknown keys are ignored.
    async fn delete(&self, key: &str) -> Result<(), SessionStoreError>;

    /// Remove every entry expired at `now`, returning how many were dropped.
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionStoreError>;
}
