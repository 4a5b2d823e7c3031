//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. JSON columns stay as
//! `serde_json::Value` here; the repositories own the document mapping.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{sessions, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub user_name: String,
    pub password_hash: String,
    pub carousels: serde_json::Value,
    pub active_carousel: Option<serde_json::Value>,
}

/// Insertable struct for creating new user documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub user_name: &'a str,
    pub password_hash: &'a str,
    pub carousels: serde_json::Value,
    pub active_carousel: Option<serde_json::Value>,
}

/// Changeset replacing the mutable part of a user document.
///
/// `treat_none_as_null` makes clearing the active carousel write SQL `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserDocumentUpdate<'a> {
    pub user_name: &'a str,
    pub password_hash: &'a str,
    pub carousels: serde_json::Value,
    pub active_carousel: Option<serde_json::Value>,
}

/// Row struct for reading session state.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SessionRow {
    pub state: serde_json::Value,
}

/// Insertable struct for new sessions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub(crate) struct NewSessionRow<'a> {
    pub session_key: &'a str,
    pub state: serde_json::Value,
    pub expires_at: DateTime<Utc>,
}
