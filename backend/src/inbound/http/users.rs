//! Account handlers: login, signup, logout and the user snapshot.
//!
//! ```text
//! POST /login {"userName":"ann","password":"pw"}
//! POST /signup {"id":"u1","userName":"ann","password":"pw"}
//! POST /logout
//! GET /getUser/u1
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    ApiResult, CredentialsValidationError, Error, LoginCredentials, SignupRequest, UserProjection,
};
use crate::inbound::http::schemas::{ErrorSchema, UserProjectionSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_user_id, require,
};

const USER_NAME: FieldName = FieldName::new("userName");
const PASSWORD: FieldName = FieldName::new("password");
const ID: FieldName = FieldName::new("id");

/// Login request body for `POST /login`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[schema(example = "ann")]
    pub user_name: Option<String>,
    #[schema(example = "correct horse")]
    pub password: Option<String>,
}

/// Signup request body for `POST /signup`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequestBody {
    /// Caller-chosen, globally unique user id.
    #[schema(example = "u1")]
    pub id: Option<String>,
    #[schema(example = "ann")]
    pub user_name: Option<String>,
    #[schema(example = "correct horse")]
    pub password: Option<String>,
}

/// `{ "user": ... }` envelope.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(value_type = UserProjectionSchema)]
    pub user: UserProjection,
}

/// `{ "message": ... }` envelope.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out")]
    pub message: String,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let field = match &err {
        CredentialsValidationError::UserName(_) => USER_NAME,
        CredentialsValidationError::EmptyPassword => PASSWORD,
        CredentialsValidationError::UserId(_) => ID,
    };
    invalid_field_error(field, err)
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let user_name = require(value.user_name, USER_NAME)?;
        let password = require(value.password, PASSWORD)?;
        Self::try_from_parts(&user_name, &password).map_err(map_credentials_error)
    }
}

impl TryFrom<SignupRequestBody> for SignupRequest {
    type Error = Error;

    fn try_from(value: SignupRequestBody) -> Result<Self, Self::Error> {
        let id = require(value.id, ID)?;
        let user_name = require(value.user_name, USER_NAME)?;
        let password = require(value.password, PASSWORD)?;
        Self::try_from_parts(&id, &user_name, &password).map_err(map_credentials_error)
    }
}

/// Authenticate and bind the session to the user.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Incorrect username or password", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(&user.id)?;
    Ok(web::Json(UserResponse { user }))
}

/// Register a user with an empty carousel collection.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequestBody,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing fields or name/id taken", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = SignupRequest::try_from(payload.into_inner())?;
    let user = state.signup.signup(&request).await?;
    Ok(HttpResponse::Created().json(UserResponse { user }))
}

/// Drop the server-held session.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Session cleared", body = MessageResponse)),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<web::Json<MessageResponse>> {
    if let Some(user_id) = session.user_id()? {
        info!(user_id = %user_id, "user logged out");
    }
    session.purge();
    Ok(web::Json(MessageResponse {
        message: "Logged out".to_owned(),
    }))
}

/// Fetch the session user's snapshot.
#[utoipa::path(
    get,
    path = "/getUser/{id}",
    params(("id" = String, Path, description = "User id; must match the session")),
    responses(
        (status = 200, description = "User snapshot", body = UserResponse),
        (status = 401, description = "No session, or its user is gone", body = ErrorSchema),
        (status = 403, description = "Another user's id", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/getUser/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = parse_user_id(Some(path.into_inner()), ID)?;
    session.require_owner(&user_id)?;
    let outcome = state.users.get_user(&user_id).await;
    let user = session
        .reject_if_stale(outcome, &user_id, state.users.as_ref())
        .await?;
    Ok(web::Json(UserResponse { user }))
}

#[cfg(test)]
mod tests;
