//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// One document per user: credentials plus the embedded carousels.
    users (id) {
        /// Client-chosen identifier, fixed at signup.
        id -> Text,
        /// Unique login name.
        user_name -> Text,
        /// Encoded bcrypt hash.
        password_hash -> Text,
        /// Ordered JSON array of carousels, each embedding its slides.
        carousels -> Jsonb,
        /// Copy of the active carousel, if any.
        active_carousel -> Nullable<Jsonb>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (maintained by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Server-held session state.
    sessions (session_key) {
        /// Opaque key carried by the session cookie.
        session_key -> Text,
        /// JSON object of session entries.
        state -> Jsonb,
        /// Absolute expiry; rows past it are treated as absent.
        expires_at -> Timestamptz,
    }
}
