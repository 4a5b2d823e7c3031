//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every carousel and account endpoint, the health
//! checks, and the schema wrappers from [`crate::inbound::http::schemas`].
//! Swagger UI serves it in debug builds; `cargo run --bin openapi-dump`
//! prints it for external tooling.

use crate::inbound::http::schemas::{
    CarouselSchema, ErrorCodeSchema, ErrorSchema, SlideSchema, UserProjectionSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Carousel backend API",
        description = "Account, session and carousel management for the slideshow editor."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::get_user,
        crate::inbound::http::carousels::create_carousel,
        crate::inbound::http::carousels::update_carousel,
        crate::inbound::http::carousels::delete_carousel,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        SlideSchema,
        CarouselSchema,
        UserProjectionSchema
    )),
    tags(
        (name = "users", description = "Signup, login and the session user's projection"),
        (name = "carousels", description = "Create, update and delete carousels"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
