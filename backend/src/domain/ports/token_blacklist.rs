//! Port for revoked bearer tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token blacklist adapters.
    pub enum TokenBlacklistError {
        /// Store connection could not be established.
        Connection { message: String } => "token blacklist connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token blacklist query failed: {message}",
    }
}

/// Remembers tokens that were logged out before they expired.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Record `token` as revoked. Revoking twice is not an error.
    async fn revoke(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenBlacklistError>;

    /// Whether `token` was revoked.
    async fn is_revoked(&self, token: &str) -> Result<bool, TokenBlacklistError>;
}
