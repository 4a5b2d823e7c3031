//! `SessionRepository` over a mutex-guarded map.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{SessionRepository, SessionState, SessionStoreError};

#[derive(Debug, Clone)]
struct Entry {
    state: SessionState,
    expires_at: DateTime<Utc>,
}

/// In-memory session store keyed by session key.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemorySessionRepository {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionState>, SessionStoreError> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.state.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn insert(
        &self,
        key: &str,
        state: &SessionState,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionStoreError> {
        let mut entries = self.lock();
        if entries.contains_key(key) {
            return Err(SessionStoreError::duplicate_key());
        }
        entries.insert(
            key.to_owned(),
            Entry {
                state: state.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        key: &str,
        state: &SessionState,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, SessionStoreError> {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return Ok(false);
        };
        entry.state = state.clone();
        entry.expires_at = expires_at;
        Ok(true)
    }

    async fn touch(&self, key: &str, expires_at: DateTime<Utc>) -> Result<(), SessionStoreError> {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SessionStoreError> {
        self.lock().remove(key);
        Ok(())
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionStoreError> {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok(u64::try_from(before - entries.len()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use rstest::rstest;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn state() -> SessionState {
        SessionState::from([("user_id".to_owned(), "\"u1\"".to_owned())])
    }

    #[rstest]
    #[tokio::test]
    async fn entries_expire_at_their_deadline() {
        let repo = InMemorySessionRepository::new();
        let expires_at = t0() + TimeDelta::hours(2);
        repo.insert("k", &state(), expires_at).await.expect("insert");

        let before = repo.load("k", expires_at - TimeDelta::seconds(1)).await;
        assert_eq!(before.expect("load"), Some(state()));
        let after = repo.load("k", expires_at).await;
        assert_eq!(after.expect("load"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn update_reports_unknown_keys() {
        let repo = InMemorySessionRepository::new();
        let updated = repo.update("missing", &state(), t0()).await.expect("update");
        assert!(!updated);
    }

    #[rstest]
    #[tokio::test]
    async fn touch_extends_and_delete_removes() {
        let repo = InMemorySessionRepository::new();
        repo.insert("k", &state(), t0()).await.expect("insert");
        repo.touch("k", t0() + TimeDelta::minutes(5)).await.expect("touch");
        assert!(repo.load("k", t0()).await.expect("load").is_some());

        repo.delete("k").await.expect("delete");
        assert!(repo.load("k", t0()).await.expect("load").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn cleanup_drops_only_expired_entries() {
        let repo = InMemorySessionRepository::new();
        repo.insert("old", &state(), t0()).await.expect("insert");
        repo.insert("due", &state(), t0() + TimeDelta::minutes(1))
            .await
            .expect("insert");
        repo.insert("live", &state(), t0() + TimeDelta::hours(1))
            .await
            .expect("insert");

        let dropped = repo
            .cleanup_expired(t0() + TimeDelta::minutes(1))
            .await
            .expect("cleanup");

        assert_eq!(dropped, 2);
        assert_eq!(repo.lock().len(), 1);
        assert!(repo.lock().contains_key("live"));
        let again = repo
            .cleanup_expired(t0() + TimeDelta::minutes(1))
            .await
            .expect("cleanup");
        assert_eq!(again, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_refuses_to_overwrite() {
        let repo = InMemorySessionRepository::new();
        repo.insert("k", &state(), t0()).await.expect("insert");
        let err = repo.insert("k", &state(), t0()).await.expect_err("duplicate");
        assert_eq!(err, SessionStoreError::DuplicateKey);
    }
}
