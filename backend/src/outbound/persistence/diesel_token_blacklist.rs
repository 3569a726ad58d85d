//! PostgreSQL-backed `TokenBlacklist`.
//!
//! Revoked tokens are kept until their own expiry. Rows past `expires_at`
//! are ignored on lookup and purged whenever another token is revoked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TokenBlacklist, TokenBlacklistError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewRevokedTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::revoked_tokens;

/// Diesel-backed implementation of the `TokenBlacklist` port.
#[derive(Clone)]
pub struct DieselTokenBlacklist {
    pool: DbPool,
}

impl DieselTokenBlacklist {
    /// Create a new blacklist with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenBlacklistError {
    map_basic_pool_error(error, TokenBlacklistError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TokenBlacklistError {
    map_basic_diesel_error(
        error,
        TokenBlacklistError::query,
        TokenBlacklistError::connection,
    )
}

#[async_trait]
impl TokenBlacklist for DieselTokenBlacklist {
    async fn revoke(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenBlacklistError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            revoked_tokens::table.filter(revoked_tokens::expires_at.le(diesel::dsl::now)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        diesel::insert_into(revoked_tokens::table)
            .values(&NewRevokedTokenRow { token, expires_at })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, TokenBlacklistError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            revoked_tokens::table.filter(
                revoked_tokens::token
                    .eq(token)
                    .and(revoked_tokens::expires_at.gt(diesel::dsl::now)),
            ),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
