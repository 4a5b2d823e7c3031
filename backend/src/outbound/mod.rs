//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: in-process repositories for tests and database-less runs.
//! - **bcrypt_hasher**: salted password hashing.
//! - **session_store**: bridges the `SessionRepository` port into
//!   actix-session's storage backend trait.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod bcrypt_hasher;
pub mod memory;
pub mod persistence;
pub mod session_store;
