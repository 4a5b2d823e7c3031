//! HTTP inbound adapter exposing the account and carousel endpoints.

use actix_web::web;

pub mod carousels;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[doc(hidden)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

/// Register the session-protected API routes.
///
/// The caller wraps the scope in the session middleware and supplies
/// [`state::HttpState`] as app data.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use carousel_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::login)
        .service(users::signup)
        .service(users::logout)
        .service(users::get_user)
        .service(carousels::create_carousel)
        .service(carousels::update_carousel)
        .service(carousels::delete_carousel);
}
