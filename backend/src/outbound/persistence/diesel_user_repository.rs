//! PostgreSQL-backed `UserRepository` storing each user as one row with the
//! carousel collection embedded as jsonb.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Carousel, PasswordHash, User, UserId, UserName};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{NewUserRow, UserDocumentUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Encoded document columns shared by insert and update.
struct DocumentColumns {
    carousels: serde_json::Value,
    active_carousel: Option<serde_json::Value>,
}

fn encode_document(user: &User) -> Result<DocumentColumns, UserPersistenceError> {
    let encode_error =
        |err: serde_json::Error| UserPersistenceError::query(format!("encode carousels: {err}"));
    Ok(DocumentColumns {
        carousels: serde_json::to_value(user.carousels()).map_err(encode_error)?,
        active_carousel: user
            .active_carousel()
            .map(serde_json::to_value)
            .transpose()
            .map_err(encode_error)?,
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |field: &str, err: &dyn std::fmt::Display| {
        warn!(user_id = %row.id, field, error = %err, "stored user document is invalid");
        UserPersistenceError::query(format!("stored user document has an invalid {field}"))
    };

    let id = UserId::new(row.id.clone()).map_err(|err| invalid("id", &err))?;
    let user_name = UserName::new(&row.user_name).map_err(|err| invalid("user_name", &err))?;
    let carousels: Vec<Carousel> =
        serde_json::from_value(row.carousels).map_err(|err| invalid("carousels", &err))?;
    let active_carousel: Option<Carousel> = row
        .active_carousel
        .map(serde_json::from_value)
        .transpose()
        .map_err(|err| invalid("active_carousel", &err))?;

    Ok(User::from_parts(
        id,
        user_name,
        PasswordHash::from_encoded(row.password_hash),
        carousels,
        active_carousel,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let document = encode_document(user)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: user.id().as_ref(),
            user_name: user.user_name().as_ref(),
            password_hash: user.password_hash().as_encoded(),
            carousels: document.carousels,
            active_carousel: document.active_carousel,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match unique_violation(&err) {
                Some(constraint) => UserPersistenceError::duplicate(constraint),
                None => map_diesel_error(err),
            })
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let document = encode_document(user)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = UserDocumentUpdate {
            user_name: user.user_name().as_ref(),
            password_hash: user.password_hash().as_encoded(),
            carousels: document.carousels,
            active_carousel: document.active_carousel,
        };

        let updated = diesel::update(users::table.filter(users::id.eq(user.id().as_ref())))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(|err| match unique_violation(&err) {
                Some(constraint) => UserPersistenceError::duplicate(constraint),
                None => map_diesel_error(err),
            })?;

        if updated == 0 {
            return Err(UserPersistenceError::missing(user.id().as_ref()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::user_name.eq(user_name.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}
