//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update the matching block here (or regenerate
//! with `diesel print-schema`).

diesel::table! {
    /// City documents with their places embedded as JSONB.
    cities (id) {
        /// 24-digit lowercase hexadecimal identifier.
        id -> Text,
        /// Caller-supplied external identifier.
        city_id -> Text,
        /// Display name; filtered case-insensitively.
        city_name -> Text,
        /// Embedded places, each with its ratings and reviews.
        places -> Jsonb,
        /// Compare-and-swap counter.
        revision -> Int4,
        /// Insertion time.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Legacy business catalogue.
    businesses (id) {
        id -> Text,
        name -> Text,
        town -> Text,
        rating -> Float8,
        /// Embedded reviews.
        reviews -> Jsonb,
        revision -> Int4,
        /// Insertion time; list order.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered accounts. `email` carries the `accounts_email_key`
    /// unique constraint.
    accounts (username) {
        username -> Text,
        email -> Text,
        name -> Text,
        /// PHC string produced by the password hasher.
        password_hash -> Text,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tokens revoked by logout, kept until they would have expired.
    revoked_tokens (token) {
        token -> Text,
        expires_at -> Timestamptz,
        revoked_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(accounts, businesses, cities, revoked_tokens);
