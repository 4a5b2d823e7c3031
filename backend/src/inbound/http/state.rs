//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CarouselCommand, LoginService, SignupService, UserQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
    pub carousels: Arc<dyn CarouselCommand>,
    pub users: Arc<dyn UserQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use carousel_backend::domain::ports::FixturePasswordHasher;
    /// use carousel_backend::domain::{AccountService, CarouselService};
    /// use carousel_backend::inbound::http::state::HttpState;
    /// use carousel_backend::outbound::memory::InMemoryUserRepository;
    ///
    /// let users = Arc::new(InMemoryUserRepository::new());
    /// let accounts = Arc::new(AccountService::new(users.clone(), Arc::new(FixturePasswordHasher)));
    /// let carousels = Arc::new(CarouselService::new(users, Arc::new(mockable::DefaultClock)));
    /// let state = HttpState::new(accounts.clone(), accounts, carousels.clone(), carousels);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        signup: Arc<dyn SignupService>,
        carousels: Arc<dyn CarouselCommand>,
        users: Arc<dyn UserQuery>,
    ) -> Self {
        Self {
            login,
            signup,
            carousels,
            users,
        }
    }
}
