//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed carousel ownership model and the use
//! cases that mutate it. Types document their invariants and serde contracts
//! in their own Rustdoc; adapters depend on this module, never the reverse.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - User / UserProjection: the per-user document and its client view.
//! - Carousel / Slide / CarouselDraft / CarouselPatch: the embedded records
//!   and the inputs that create or merge them.
//! - AccountService / CarouselService: implementations of the driving ports.

pub mod account_service;
pub mod auth;
pub mod carousel;
pub mod carousel_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, SignupRequest};
pub use self::carousel::{
    Carousel, CarouselDraft, CarouselId, CarouselPatch, CarouselValidationError, Slide,
    TransitionInterval, TransitionType,
};
pub use self::carousel_service::CarouselService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{
    DuplicateCarousel, PasswordHash, USER_NAME_MAX, User, UserId, UserName, UserProjection,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use carousel_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
