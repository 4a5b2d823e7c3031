//! In-process adapters for running without PostgreSQL.
//!
//! Used by the integration tests and by the server when no database URL is
//! configured. State lives only as long as the process. Each call takes the
//! lock once, so concurrent read-modify-write cycles race exactly as they do
//! against the database.

mod session_repository;
mod user_repository;

pub use session_repository::InMemorySessionRepository;
pub use user_repository::InMemoryUserRepository;
