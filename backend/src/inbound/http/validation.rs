//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies declare their fields as `Option` so a missing field is
//! reported with the same structured `details` as an invalid one rather than
//! as an opaque deserialization failure.

use serde_json::json;

use crate::domain::{CarouselId, Error, UserId};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        name,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

pub(crate) fn invalid_field_error(field: FieldName, reason: impl std::fmt::Display) -> Error {
    let name = field.as_str();
    field_error(name, ErrorCode::InvalidValue, format!("{name}: {reason}"))
}

/// Report a bad `url` on the slide at `index` under the `slides` array of
/// `parent`, as `parent.slides[index].url`.
pub(crate) fn invalid_slide_url_error(
    parent: FieldName,
    index: usize,
    reason: impl std::fmt::Display,
) -> Error {
    let path = format!("{}.slides[{index}].url", parent.as_str());
    let message = format!("{path}: {reason}");
    field_error(&path, ErrorCode::InvalidValue, message)
}

/// Unwrap a present field or report it as missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_user_id(value: Option<String>, field: FieldName) -> Result<UserId, Error> {
    UserId::new(require(value, field)?).map_err(|err| invalid_field_error(field, err))
}

pub(crate) fn parse_carousel_id(
    value: Option<String>,
    field: FieldName,
) -> Result<CarouselId, Error> {
    CarouselId::new(require(value, field)?).map_err(|err| invalid_field_error(field, err))
}
