//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`UserRepository`, `SessionRepository`, `PasswordHasher`)
//! are implemented by outbound adapters. Driving ports (`LoginService`,
//! `SignupService`, `CarouselCommand`, `UserQuery`) are implemented by the
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod carousel_command;
mod login_service;
mod password_hasher;
mod session_repository;
mod user_repository;

#[cfg(test)]
pub use carousel_command::{MockCarouselCommand, MockUserQuery};
pub use carousel_command::{CarouselCommand, UserQuery};
#[cfg(test)]
pub use login_service::{MockLoginService, MockSignupService};
pub use login_service::{LoginService, SignupService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{SessionRepository, SessionState, SessionStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub(crate) use user_repository::map_user_persistence_error;
pub use user_repository::{UserPersistenceError, UserRepository};
