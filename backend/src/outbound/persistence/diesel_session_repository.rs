//! PostgreSQL-backed `SessionRepository` over the `sessions` table.
//!
//! Expired rows are filtered at read time and never returned;
//! `cleanup_expired` deletes them in bulk.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{SessionRepository, SessionState, SessionStoreError};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{NewSessionRow, SessionRow};
use super::pool::{DbPool, PoolError};
use super::schema::sessions;

/// Diesel-backed implementation of the `SessionRepository` port.
#[derive(Clone)]
pub struct DieselSessionRepository {
    pool: DbPool,
}

impl DieselSessionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SessionStoreError {
    map_basic_pool_error(error, SessionStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SessionStoreError {
    map_basic_diesel_error(error, SessionStoreError::query, SessionStoreError::connection)
}

fn encode_state(state: &SessionState) -> Result<serde_json::Value, SessionStoreError> {
    serde_json::to_value(state).map_err(|err| SessionStoreError::serialization(err.to_string()))
}

fn decode_state(value: serde_json::Value) -> Result<SessionState, SessionStoreError> {
    serde_json::from_value(value).map_err(|err| SessionStoreError::serialization(err.to_string()))
}

#[async_trait]
impl SessionRepository for DieselSessionRepository {
    async fn load(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionState>, SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SessionRow> = sessions::table
            .filter(sessions::session_key.eq(key))
            .filter(sessions::expires_at.gt(now))
            .select(SessionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| decode_state(row.state)).transpose()
    }

    async fn insert(
        &self,
        key: &str,
        state: &SessionState,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionStoreError> {
        let row = NewSessionRow {
            session_key: key,
            state: encode_state(state)?,
            expires_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(sessions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match unique_violation(&err) {
                Some(_) => SessionStoreError::duplicate_key(),
                None => map_diesel_error(err),
            })
    }

    async fn update(
        &self,
        key: &str,
        state: &SessionState,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, SessionStoreError> {
        let encoded = encode_state(state)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(sessions::table.filter(sessions::session_key.eq(key)))
            .set((
                sessions::state.eq(encoded),
                sessions::expires_at.eq(expires_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn touch(&self, key: &str, expires_at: DateTime<Utc>) -> Result<(), SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(sessions::table.filter(sessions::session_key.eq(key)))
            .set(sessions::expires_at.eq(expires_at))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(sessions::table.filter(sessions::session_key.eq(key)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(deleted, cutoff = %now, "purged expired sessions");
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}
