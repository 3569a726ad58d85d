//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Embedded documents travel as
//! `serde_json::Value`; conversion to domain types happens in the
//! repositories.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{accounts, businesses, cities, revoked_tokens};

// ---------------------------------------------------------------------------
// City models
// ---------------------------------------------------------------------------

/// Row struct for reading a full city document.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CityRow {
    pub id: String,
    pub city_id: String,
    pub city_name: String,
    pub places: serde_json::Value,
    pub revision: i32,
}

/// Row struct for the city list, which never loads places.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CitySummaryRow {
    pub id: String,
    pub city_id: String,
    pub city_name: String,
}

/// Insertable struct for new cities.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cities)]
pub(crate) struct NewCityRow<'a> {
    pub id: &'a str,
    pub city_id: &'a str,
    pub city_name: &'a str,
    pub places: serde_json::Value,
    pub revision: i32,
}

/// Changeset for whole-document replacement.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cities)]
pub(crate) struct CityUpdate<'a> {
    pub city_id: &'a str,
    pub city_name: &'a str,
    pub places: serde_json::Value,
    pub revision: i32,
}

// ---------------------------------------------------------------------------
// Business models
// ---------------------------------------------------------------------------

/// Row struct for reading a business.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = businesses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BusinessRow {
    pub id: String,
    pub name: String,
    pub town: String,
    pub rating: f64,
    pub reviews: serde_json::Value,
    pub revision: i32,
}

/// Insertable struct for new businesses.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = businesses)]
pub(crate) struct NewBusinessRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub town: &'a str,
    pub rating: f64,
    pub reviews: serde_json::Value,
    pub revision: i32,
}

/// Changeset for whole-document replacement.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = businesses)]
pub(crate) struct BusinessUpdate<'a> {
    pub name: &'a str,
    pub town: &'a str,
    pub rating: f64,
    pub reviews: serde_json::Value,
    pub revision: i32,
}

// ---------------------------------------------------------------------------
// Account models
// ---------------------------------------------------------------------------

/// Row struct for reading an account.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Revoked token models
// ---------------------------------------------------------------------------

/// Insertable struct for a revoked token.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = revoked_tokens)]
pub(crate) struct NewRevokedTokenRow<'a> {
    pub token: &'a str,
    pub expires_at: DateTime<Utc>,
}
