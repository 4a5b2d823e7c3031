//! Carousel CRUD handlers.
//!
//! Every route names its owner explicitly with `userId`; the value must match
//! the session user. Each call is one read-modify-write of the owner's
//! document through [`CarouselCommand`](crate::domain::ports::CarouselCommand).

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    ApiResult, Carousel, CarouselDraft, CarouselPatch, CarouselValidationError, Error, Slide,
};
use crate::inbound::http::schemas::{CarouselSchema, ErrorSchema, SlideSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponse;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, invalid_slide_url_error, parse_carousel_id, parse_user_id,
    require,
};

const USER_ID: FieldName = FieldName::new("userId");
const CAROUSEL_ID: FieldName = FieldName::new("carouselId");
const CAROUSEL_DATA: FieldName = FieldName::new("carouselData");
const UPDATED_DATA: FieldName = FieldName::new("updatedCarouselData");
const DATA_ID: FieldName = FieldName::new("carouselData.id");
const DATA_TITLE: FieldName = FieldName::new("carouselData.title");
const UPDATED_TITLE: FieldName = FieldName::new("updatedCarouselData.title");

/// Attribute a carousel validation failure to the request field under `parent`.
fn carousel_field_error(
    parent: FieldName,
    title: FieldName,
    err: CarouselValidationError,
) -> Error {
    match err {
        CarouselValidationError::EmptySlideUrl { index } => {
            invalid_slide_url_error(parent, index, &err)
        }
        other => invalid_field_error(title, other),
    }
}

/// Carousel fields as sent by the editor.
///
/// `createdAt` is accepted but ignored: the server stamps creation time and
/// never changes it.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselData {
    /// Required on create; ignored on update.
    #[schema(example = "carousel-1717171717171-42")]
    pub id: Option<String>,
    #[schema(example = "Holiday")]
    pub title: Option<String>,
    #[schema(value_type = Option<Vec<SlideSchema>>)]
    pub slides: Option<Vec<Slide>>,
    pub active: Option<bool>,
}

impl CarouselData {
    fn into_draft(self) -> Result<CarouselDraft, Error> {
        let id = parse_carousel_id(self.id, DATA_ID)?;
        let title = require(self.title, DATA_TITLE)?;
        CarouselDraft::try_new(
            id,
            title,
            self.slides.unwrap_or_default(),
            self.active.unwrap_or(false),
        )
        .map_err(|err| carousel_field_error(CAROUSEL_DATA, DATA_TITLE, err))
    }

    fn into_patch(self) -> Result<CarouselPatch, Error> {
        let patch = CarouselPatch {
            title: self.title,
            slides: self.slides,
            active: self.active,
        };
        patch
            .validate()
            .map_err(|err| carousel_field_error(UPDATED_DATA, UPDATED_TITLE, err))?;
        Ok(patch)
    }
}

/// Body of `POST /NewCarousel`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCarouselRequest {
    #[schema(example = "u1")]
    pub user_id: Option<String>,
    pub carousel_data: Option<CarouselData>,
}

/// Body of `POST /updateCarousel`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCarouselRequest {
    #[schema(example = "u1")]
    pub user_id: Option<String>,
    #[schema(example = "carousel-1717171717171-42")]
    pub carousel_id: Option<String>,
    /// Top-level fields to overwrite; absent fields keep their stored value.
    pub updated_carousel_data: Option<CarouselData>,
}

/// Body of `DELETE /deleteCarousel`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteCarouselRequest {
    #[schema(example = "u1")]
    pub user_id: Option<String>,
    #[schema(example = "carousel-1717171717171-42")]
    pub carousel_id: Option<String>,
}

/// `{ "message": ..., "carousel": ... }` envelope.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CarouselResponse {
    #[schema(example = "Carousel saved successfully")]
    pub message: String,
    #[schema(value_type = CarouselSchema)]
    pub carousel: Carousel,
}

/// Append a carousel to the session user's collection.
#[utoipa::path(
    post,
    path = "/NewCarousel",
    request_body = NewCarouselRequest,
    responses(
        (status = 201, description = "Carousel stored", body = CarouselResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "No session, or its user is gone", body = ErrorSchema),
        (status = 403, description = "Another user's id", body = ErrorSchema),
        (status = 409, description = "Carousel id already used", body = ErrorSchema)
    ),
    tags = ["carousels"],
    operation_id = "newCarousel"
)]
#[post("/NewCarousel")]
pub async fn create_carousel(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewCarouselRequest>,
) -> ApiResult<HttpResponse> {
    let NewCarouselRequest {
        user_id,
        carousel_data,
    } = payload.into_inner();
    let user_id = parse_user_id(user_id, USER_ID)?;
    session.require_owner(&user_id)?;
    let draft = require(carousel_data, CAROUSEL_DATA)?.into_draft()?;

    let outcome = state.carousels.create_carousel(&user_id, draft).await;
    let carousel = session
        .reject_if_stale(outcome, &user_id, state.users.as_ref())
        .await?;
    info!(user_id = %user_id, carousel_id = %carousel.id, "carousel created");
    Ok(HttpResponse::Created().json(CarouselResponse {
        message: "Carousel saved successfully".to_owned(),
        carousel,
    }))
}

/// Shallow-merge new field values into an existing carousel.
#[utoipa::path(
    post,
    path = "/updateCarousel",
    request_body = UpdateCarouselRequest,
    responses(
        (status = 200, description = "Merged carousel", body = CarouselResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "No session, or its user is gone", body = ErrorSchema),
        (status = 403, description = "Another user's id", body = ErrorSchema),
        (status = 404, description = "Carousel not found", body = ErrorSchema)
    ),
    tags = ["carousels"],
    operation_id = "updateCarousel"
)]
#[post("/updateCarousel")]
pub async fn update_carousel(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateCarouselRequest>,
) -> ApiResult<web::Json<CarouselResponse>> {
    let UpdateCarouselRequest {
        user_id,
        carousel_id,
        updated_carousel_data,
    } = payload.into_inner();
    let user_id = parse_user_id(user_id, USER_ID)?;
    session.require_owner(&user_id)?;
    let carousel_id = parse_carousel_id(carousel_id, CAROUSEL_ID)?;
    let patch = require(updated_carousel_data, UPDATED_DATA)?.into_patch()?;

    let outcome = state
        .carousels
        .update_carousel(&user_id, &carousel_id, patch)
        .await;
    let carousel = session
        .reject_if_stale(outcome, &user_id, state.users.as_ref())
        .await?;
    info!(user_id = %user_id, carousel_id = %carousel_id, "carousel updated");
    Ok(web::Json(CarouselResponse {
        message: "Carousel updated successfully".to_owned(),
        carousel,
    }))
}

/// Remove a carousel; unknown ids succeed without change.
#[utoipa::path(
    delete,
    path = "/deleteCarousel",
    request_body = DeleteCarouselRequest,
    responses(
        (status = 200, description = "Carousel removed", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "No session, or its user is gone", body = ErrorSchema),
        (status = 403, description = "Another user's id", body = ErrorSchema)
    ),
    tags = ["carousels"],
    operation_id = "deleteCarousel"
)]
#[delete("/deleteCarousel")]
pub async fn delete_carousel(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DeleteCarouselRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let DeleteCarouselRequest {
        user_id,
        carousel_id,
    } = payload.into_inner();
    let user_id = parse_user_id(user_id, USER_ID)?;
    session.require_owner(&user_id)?;
    let carousel_id = parse_carousel_id(carousel_id, CAROUSEL_ID)?;

    let outcome = state.carousels.delete_carousel(&user_id, &carousel_id).await;
    session
        .reject_if_stale(outcome, &user_id, state.users.as_ref())
        .await?;
    info!(user_id = %user_id, carousel_id = %carousel_id, "carousel deleted");
    Ok(web::Json(MessageResponse {
        message: "Carousel deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
#[path = "carousels_tests.rs"]
mod tests;
