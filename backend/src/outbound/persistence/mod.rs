//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the storage ports backed by PostgreSQL via
//! `diesel-async` and a `bb8` pool.
//!
//! - **Documents**: cities and businesses are stored one row per document;
//!   their nested places and reviews live in JSONB columns, so every nested
//!   write replaces the whole row under a revision check.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Errors**: Diesel and pool failures are mapped onto each port's
//!   error enum.
//!
//! # Example
//!
//! ```ignore
//! use food_places::outbound::persistence::{DbPool, DieselCityRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/food_places")).await?;
//! let cities = DieselCityRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_business_repository;
mod diesel_city_repository;
mod diesel_token_blacklist;
mod migrations;
mod models;
mod pool;
mod revision;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_business_repository::DieselBusinessRepository;
pub use diesel_city_repository::DieselCityRepository;
pub use diesel_token_blacklist::DieselTokenBlacklist;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
