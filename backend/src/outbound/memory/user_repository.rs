//! `UserRepository` over a mutex-guarded map.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, UserName};

/// In-memory user store keyed by user id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, User>> {
        // A panicking writer cannot leave a half-written `User` behind: values
        // are replaced whole.
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock();
        if users.contains_key(user.id().as_ref()) {
            return Err(UserPersistenceError::duplicate("users_pkey"));
        }
        if users
            .values()
            .any(|existing| existing.user_name() == user.user_name())
        {
            return Err(UserPersistenceError::duplicate("users_user_name_key"));
        }
        users.insert(user.id().as_ref().to_owned(), user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock();
        let Some(slot) = users.get_mut(user.id().as_ref()) else {
            return Err(UserPersistenceError::missing(user.id().as_ref()));
        };
        *slot = user.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().get(id.as_ref()).cloned())
    }

    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .values()
            .find(|user| user.user_name() == user_name)
            .cloned())
    }
}
