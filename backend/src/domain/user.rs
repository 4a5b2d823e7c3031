//! User aggregate root.
//!
//! A [`User`] owns its carousels (and through them, their slides) as a single
//! document. Every mutation loads the whole aggregate, changes it in memory and
//! saves it back, so the collection-level invariants live here.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::carousel::{Carousel, CarouselId, CarouselPatch};

/// Maximum allowed length for a user name.
pub const USER_NAME_MAX: usize = 64;

/// Validation errors returned by user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was missing or blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier carried leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    InvalidId,
    /// User name was missing or blank.
    #[error("user name must not be empty")]
    EmptyUserName,
    /// User name exceeded [`USER_NAME_MAX`] characters.
    #[error("user name must be at most {max} characters")]
    UserNameTooLong {
        /// Upper bound on the character count.
        max: usize,
    },
}

/// Stable, globally unique user identifier chosen at signup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Trim, validate and construct a [`UserName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUserName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::UserNameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Encoded salted password hash. Never leaves the server.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-encoded hash string.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash, for persistence adapters and verifiers only.
    pub fn as_encoded(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Raised when a carousel id is already present in the user's collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("carousel {carousel_id} already exists")]
pub struct DuplicateCarousel {
    /// The clashing identifier.
    pub carousel_id: CarouselId,
}

/// User document: credentials plus the ordered carousel collection.
///
/// ## Invariants
/// - No two carousels share an id.
/// - `active_carousel`, when set, matches a carousel id in `carousels` at the
///   time it was set; deleting that carousel clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    user_name: UserName,
    password_hash: PasswordHash,
    carousels: Vec<Carousel>,
    active_carousel: Option<Carousel>,
}

impl User {
    /// A freshly signed-up user with no carousels.
    pub fn new(id: UserId, user_name: UserName, password_hash: PasswordHash) -> Self {
        Self {
            id,
            user_name,
            password_hash,
            carousels: Vec::new(),
            active_carousel: None,
        }
    }

    /// Rebuild a stored document. Persistence adapters use this.
    pub fn from_parts(
        id: UserId,
        user_name: UserName,
        password_hash: PasswordHash,
        carousels: Vec<Carousel>,
        active_carousel: Option<Carousel>,
    ) -> Self {
        Self {
            id,
            user_name,
            password_hash,
            carousels,
            active_carousel,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Carousels in display order.
    pub fn carousels(&self) -> &[Carousel] {
        &self.carousels
    }

    pub fn active_carousel(&self) -> Option<&Carousel> {
        self.active_carousel.as_ref()
    }

    /// Find a carousel by id.
    pub fn carousel(&self, carousel_id: &CarouselId) -> Option<&Carousel> {
        self.carousels.iter().find(|c| &c.id == carousel_id)
    }

    /// Append a carousel, keeping ids unique.
    pub fn add_carousel(&mut self, carousel: Carousel) -> Result<&Carousel, DuplicateCarousel> {
        if self.carousel(&carousel.id).is_some() {
            return Err(DuplicateCarousel {
                carousel_id: carousel.id,
            });
        }
        let index = self.carousels.len();
        self.carousels.push(carousel);
        Ok(&self.carousels[index])
    }

    /// Shallow-merge `patch` into the matching carousel.
    ///
    /// Returns `None` when the carousel does not exist.
    pub fn update_carousel(
        &mut self,
        carousel_id: &CarouselId,
        patch: CarouselPatch,
    ) -> Option<&Carousel> {
        let carousel = self.carousels.iter_mut().find(|c| &c.id == carousel_id)?;
        patch.apply_to(carousel);
        Some(carousel)
    }

    /// Remove the matching carousel and any active reference to it.
    ///
    /// Returns whether the document changed, so a dangling active reference
    /// cleared on its own still counts.
    pub fn remove_carousel(&mut self, carousel_id: &CarouselId) -> bool {
        let before = self.carousels.len();
        self.carousels.retain(|c| &c.id != carousel_id);
        let cleared_active = self
            .active_carousel
            .take_if(|active| &active.id == carousel_id)
            .is_some();
        cleared_active || self.carousels.len() != before
    }

    /// Client-facing view without the credential hash.
    pub fn projection(&self) -> UserProjection {
        UserProjection {
            id: self.id.clone(),
            user_name: self.user_name.clone(),
            carousels: self.carousels.clone(),
            active_carousel: self.active_carousel.clone(),
        }
    }
}

/// Read projection of a [`User`] returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjection {
    pub id: UserId,
    pub user_name: UserName,
    pub carousels: Vec<Carousel>,
    pub active_carousel: Option<Carousel>,
}
