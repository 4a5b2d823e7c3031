//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::outbound::memory::InMemorySessionRepository;
use crate::outbound::session_store::PortSessionStore;

/// Build a session middleware configured for tests.
///
/// - Backs sessions with a fresh in-memory repository.
/// - Generates a fresh signing key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<PortSessionStore> {
    let store = PortSessionStore::new(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(DefaultClock),
    );
    SessionMiddleware::builder(store, Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
