//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers below mirror their wire shape and are registered with utoipa
//! under the domain type's path.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with stored state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "missing required field: userId")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "6f2c1c9e-5d1a-4b8e-9a43-0c9a1e0f7b21")]
    trace_id: Option<String>,
    /// Field-level context for validation failures.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Slide`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Slide, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SlideSchema {
    /// Media location.
    #[schema(example = "https://example.com/cat.gif")]
    url: String,
    /// One of `Slide`, `Fade`, `Zoom`, or empty when unselected.
    #[schema(example = "Fade")]
    transition_type: String,
    /// Non-negative seconds.
    #[schema(example = 2.5)]
    transition_interval: f64,
    /// Editor display flag.
    is_collapsed: bool,
}

/// OpenAPI schema for [`crate::domain::Carousel`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Carousel, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CarouselSchema {
    /// Identifier unique within the owner's collection.
    #[schema(example = "carousel-1717171717171-42")]
    id: String,
    #[schema(example = "Holiday")]
    title: String,
    /// Slides in playback order.
    slides: Vec<SlideSchema>,
    /// Server-assigned creation time; never changes.
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    active: bool,
}

/// OpenAPI schema for [`crate::domain::UserProjection`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserProjection, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserProjectionSchema {
    /// Stable user identifier chosen at signup.
    #[schema(example = "user-1")]
    id: String,
    #[schema(example = "ann")]
    user_name: String,
    /// Owned carousels in insertion order.
    carousels: Vec<CarouselSchema>,
    active_carousel: Option<CarouselSchema>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn schemas_are_registered_under_domain_paths() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert_eq!(CarouselSchema::name(), "crate.domain.Carousel");
        assert_eq!(UserProjectionSchema::name(), "crate.domain.UserProjection");
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn wire_fields_are_camel_case() {
        let carousel = schema_to_json::<CarouselSchema>();
        assert!(carousel.contains("createdAt"));
        let slide = schema_to_json::<SlideSchema>();
        assert!(slide.contains("transitionInterval"));
        assert!(slide.contains("isCollapsed"));
        let user = schema_to_json::<UserProjectionSchema>();
        assert!(user.contains("activeCarousel"));
        let error = schema_to_json::<ErrorSchema>();
        assert!(error.contains("traceId"));
    }
}
