//! actix-session storage backend over the [`SessionRepository`] port.
//!
//! The cookie carries a random 64 character key; state and expiry live in
//! the repository. Expiry is computed from the injected clock so tests can
//! move time without sleeping.

use std::collections::HashMap;
use std::sync::Arc;

use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_web::cookie::time::Duration;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::domain::ports::{SessionRepository, SessionStoreError};

const SESSION_KEY_LEN: usize = 64;
const MAX_KEY_ATTEMPTS: usize = 3;

/// [`SessionStore`] implementation delegating to a [`SessionRepository`].
#[derive(Clone)]
pub struct PortSessionStore {
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl PortSessionStore {
    /// Wrap a session repository; `clock` decides expiry.
    pub fn new(sessions: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { sessions, clock }
    }

    /// Drop every session that has expired by the store's clock.
    ///
    /// # Errors
    ///
    /// Propagates the repository failure.
    pub async fn purge_expired(&self) -> Result<u64, SessionStoreError> {
        self.sessions.cleanup_expired(self.clock.utc()).await
    }

    /// Purge expired sessions every `period` for as long as the task lives.
    /// Failures are logged and retried on the next tick.
    pub async fn run_expiry_sweeper(self, period: std::time::Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "expired sessions purged"),
                Err(err) => warn!(error = %err, "session sweep failed"),
            }
        }
    }

    fn expires_at(&self, ttl: &Duration) -> DateTime<Utc> {
        let now = self.clock.utc();
        TimeDelta::try_seconds(ttl.whole_seconds())
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    async fn insert_fresh(
        &self,
        state: &HashMap<String, String>,
        ttl: &Duration,
    ) -> Result<SessionKey, SaveError> {
        let expires_at = self.expires_at(ttl);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let key = generate_session_key();
            match self.sessions.insert(&key, state, expires_at).await {
                Ok(()) => {
                    return SessionKey::try_from(key)
                        .map_err(|err| SaveError::Other(anyhow::anyhow!("{err}")));
                }
                Err(SessionStoreError::DuplicateKey) if attempt < MAX_KEY_ATTEMPTS => {
                    warn!(attempt, "session key collision, regenerating");
                }
                Err(err @ SessionStoreError::Serialization { .. }) => {
                    return Err(SaveError::Serialization(anyhow::Error::new(err)));
                }
                Err(err) => return Err(SaveError::Other(anyhow::Error::new(err))),
            }
        }
    }
}

fn generate_session_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LEN)
        .map(char::from)
        .collect()
}

impl SessionStore for PortSessionStore {
    async fn load(
        &self,
        session_key: &SessionKey,
    ) -> Result<Option<HashMap<String, String>>, LoadError> {
        self.sessions
            .load(session_key.as_ref(), self.clock.utc())
            .await
            .map_err(|err| match err {
                SessionStoreError::Serialization { .. } => {
                    LoadError::Deserialization(anyhow::Error::new(err))
                }
                other => LoadError::Other(anyhow::Error::new(other)),
            })
    }

    async fn save(
        &self,
        session_state: HashMap<String, String>,
        ttl: &Duration,
    ) -> Result<SessionKey, SaveError> {
        self.insert_fresh(&session_state, ttl).await
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: HashMap<String, String>,
        ttl: &Duration,
    ) -> Result<SessionKey, UpdateError> {
        let updated = self
            .sessions
            .update(session_key.as_ref(), &session_state, self.expires_at(ttl))
            .await
            .map_err(|err| match err {
                SessionStoreError::Serialization { .. } => {
                    UpdateError::Serialization(anyhow::Error::new(err))
                }
                other => UpdateError::Other(anyhow::Error::new(other)),
            })?;
        if updated {
            return Ok(session_key);
        }

        // The row expired or was purged: issue a fresh key for the same state.
        self.insert_fresh(&session_state, ttl)
            .await
            .map_err(|err| match err {
                SaveError::Serialization(inner) => UpdateError::Serialization(inner),
                SaveError::Other(inner) => UpdateError::Other(inner),
            })
    }

    async fn update_ttl(&self, session_key: &SessionKey, ttl: &Duration) -> anyhow::Result<()> {
        self.sessions
            .touch(session_key.as_ref(), self.expires_at(ttl))
            .await
            .map_err(anyhow::Error::new)
    }

    async fn delete(&self, session_key: &SessionKey) -> anyhow::Result<()> {
        self.sessions
            .delete(session_key.as_ref())
            .await
            .map_err(anyhow::Error::new)
    }
}
