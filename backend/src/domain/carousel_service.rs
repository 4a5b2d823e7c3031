//! Carousel CRUD use-cases over the per-user document.
//!
//! Each operation loads the whole user, mutates the embedded collection in
//! memory and saves the whole user back. Nothing serialises concurrent
//! mutations of the same user: two overlapping read-modify-write cycles race
//! and the later `save` silently discards the earlier one.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CarouselCommand, UserPersistenceError, UserQuery, UserRepository, map_user_persistence_error,
};
use crate::domain::{
    Carousel, CarouselDraft, CarouselId, CarouselPatch, Error, User, UserId, UserProjection,
};

/// Carousel service implementing [`CarouselCommand`] and [`UserQuery`].
#[derive(Clone)]
pub struct CarouselService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl CarouselService {
    /// Create a service over a user store; `clock` stamps `createdAt`.
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn store_user(&self, user: &User) -> Result<(), Error> {
        self.users.save(user).await.map_err(|err| match err {
            // The document vanished between load and save.
            UserPersistenceError::Missing { user_id } => {
                Error::not_found(format!("user {user_id} not found"))
            }
            other => map_user_persistence_error(other),
        })
    }
}

#[async_trait]
impl CarouselCommand for CarouselService {
    async fn create_carousel(
        &self,
        user_id: &UserId,
        draft: CarouselDraft,
    ) -> Result<Carousel, Error> {
        let mut user = self.load_user(user_id).await?;
        let carousel = draft.into_carousel(self.clock.utc());
        let stored = user
            .add_carousel(carousel)
            .map_err(|err| Error::conflict(err.to_string()))?
            .clone();
        self.store_user(&user).await?;
        info!(%user_id, carousel_id = %stored.id, "carousel created");
        Ok(stored)
    }

    async fn update_carousel(
        &self,
        user_id: &UserId,
        carousel_id: &CarouselId,
        patch: CarouselPatch,
    ) -> Result<Carousel, Error> {
        patch
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let mut user = self.load_user(user_id).await?;
        let merged = user
            .update_carousel(carousel_id, patch)
            .ok_or_else(|| Error::not_found(format!("carousel {carousel_id} not found")))?
            .clone();
        self.store_user(&user).await?;
        info!(%user_id, %carousel_id, "carousel updated");
        Ok(merged)
    }

    async fn delete_carousel(
        &self,
        user_id: &UserId,
        carousel_id: &CarouselId,
    ) -> Result<(), Error> {
        let mut user = self.load_user(user_id).await?;
        if !user.remove_carousel(carousel_id) {
            debug!(%user_id, %carousel_id, "delete left the document unchanged");
            return Ok(());
        }
        self.store_user(&user).await?;
        info!(%user_id, %carousel_id, "carousel deleted");
        Ok(())
    }
}

#[async_trait]
impl UserQuery for CarouselService {
    async fn get_user(&self, user_id: &UserId) -> Result<UserProjection, Error> {
        Ok(self.load_user(user_id).await?.projection())
    }

    async fn user_exists(&self, user_id: &UserId) -> Result<bool, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map(|user| user.is_some())
            .map_err(map_user_persistence_error)
    }
}

#[cfg(test)]
#[path = "carousel_service_tests.rs"]
mod tests;
