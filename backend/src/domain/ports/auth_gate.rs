//! Driving port for the account lifecycle.
//!
//! In hexagonal terms this is a *driving* port: the HTTP auth handlers and
//! the route guards call it without knowing how accounts, hashes or revoked
//! tokens are stored.

use async_trait::async_trait;

use crate::domain::{Error, IssuedToken, LoginCredentials, Principal, Registration};

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGate: Send + Sync {
    /// Create an account and issue its first token.
    async fn register(&self, registration: Registration) -> Result<IssuedToken, Error>;

    /// Check credentials and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<IssuedToken, Error>;

    /// Resolve a bearer token to its holder. Expired, forged or revoked
    /// tokens are `unauthorized`.
    async fn authenticate(&self, token: &str) -> Result<Principal, Error>;

    /// Revoke the caller's token.
    async fn logout(&self, principal: &Principal) -> Result<(), Error>;
}
