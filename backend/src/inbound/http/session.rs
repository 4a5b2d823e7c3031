//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers deal only in user ids. The session
//! state itself lives server-side behind the `SessionRepository` port; the
//! cookie carries nothing but the opaque key.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::UserQuery;
use crate::domain::{Error, ErrorCode, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes user-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session to `user_id`, rotating the session key.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The user bound to this session, if any.
    ///
    /// A stored value that is not a valid user id reads as no user.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match UserId::new(raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid user id in session state");
                None
            }
        }))
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require that the session belongs to `claimed`.
    ///
    /// `401` without a session, `403` when the session belongs to someone
    /// else.
    pub fn require_owner(&self, claimed: &UserId) -> Result<UserId, Error> {
        let user_id = self.require_user_id()?;
        if &user_id != claimed {
            warn!(session_user = %user_id, claimed_user = %claimed, "user id mismatch");
            return Err(Error::forbidden("cannot act on another user's carousels"));
        }
        Ok(user_id)
    }

    /// Turn a `not_found` raised while acting as `user_id` into `401` when
    /// the user itself is gone.
    ///
    /// Such a session outlived its user, so it is purged and the client has
    /// to log in again. Any other outcome, including `not_found` for a
    /// carousel of a live user, passes through unchanged.
    pub async fn reject_if_stale<T>(
        &self,
        outcome: Result<T, Error>,
        user_id: &UserId,
        users: &dyn UserQuery,
    ) -> Result<T, Error> {
        let error = match outcome {
            Err(error) if error.code() == ErrorCode::NotFound => error,
            other => return other,
        };
        if users.user_exists(user_id).await? {
            return Err(error);
        }
        warn!(%user_id, "session refers to a missing user");
        self.purge();
        Err(Error::unauthorized("login required"))
    }

    /// Drop the session state and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
