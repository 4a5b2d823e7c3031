//! Driving ports for the carousel CRUD use-cases.
//!
//! Every operation is scoped to one user document. Ownership has already
//! been checked by the caller; the service only sees the owning user id.

use async_trait::async_trait;

use crate::domain::{
    Carousel, CarouselDraft, CarouselId, CarouselPatch, Error, UserId, UserProjection,
};

/// Mutations of a user's carousel collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarouselCommand: Send + Sync {
    /// Append a new carousel, stamping its creation time.
    ///
    /// Fails with `not_found` when the user is missing and `conflict` when
    /// the carousel id is already taken.
    async fn create_carousel(
        &self,
        user_id: &UserId,
        draft: CarouselDraft,
    ) -> Result<Carousel, Error>;

    /// Shallow-merge `patch` into an existing carousel.
    async fn update_carousel(
        &self,
        user_id: &UserId,
        carousel_id: &CarouselId,
        patch: CarouselPatch,
    ) -> Result<Carousel, Error>;

    /// Remove a carousel. Unknown carousel ids succeed without change.
    async fn delete_carousel(&self, user_id: &UserId, carousel_id: &CarouselId)
    -> Result<(), Error>;
}

/// Read access to a user's client-facing projection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Fetch the projection of `user_id`; `not_found` when absent.
    async fn get_user(&self, user_id: &UserId) -> Result<UserProjection, Error>;

    /// Whether a user document exists for `user_id`.
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, Error>;
}
