//! Account lifecycle service: registration, login, token checks, logout.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, AuthGate, CredentialHasher, CredentialHasherError,
    TokenBlacklist, TokenBlacklistError, TokenCodec, TokenCodecError,
};
use crate::domain::{
    Account, Claims, Error, IssuedToken, LoginCredentials, Principal, Registration,
};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Knobs governing token lifetime and self-service admin accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPolicy {
    /// How long an issued token stays valid.
    pub token_ttl: TimeDelta,
    /// Whether `admin: true` at registration is honoured.
    pub allow_admin_registration: bool,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            token_ttl: TimeDelta::minutes(30),
            allow_admin_registration: false,
        }
    }
}

/// Driven ports the account service relies on.
#[derive(Clone)]
pub struct AccountPorts {
    /// Stored accounts, unique by username and email.
    pub accounts: Arc<dyn AccountRepository>,
    /// Password hashing and verification.
    pub hasher: Arc<dyn CredentialHasher>,
    /// Token signing and validation.
    pub tokens: Arc<dyn TokenCodec>,
    /// Revoked tokens awaiting expiry.
    pub blacklist: Arc<dyn TokenBlacklist>,
}

/// Implements [`AuthGate`].
#[derive(Clone)]
pub struct AccountService {
    ports: AccountPorts,
    clock: Arc<dyn Clock>,
    policy: AccountPolicy,
}

impl AccountService {
    /// Create a service over its ports.
    pub fn new(ports: AccountPorts, clock: Arc<dyn Clock>, policy: AccountPolicy) -> Self {
        Self {
            ports,
            clock,
            policy,
        }
    }

    fn issue(&self, username: &str, admin: bool) -> Result<String, Error> {
        let expires_at = self.clock.utc() + self.policy.token_ttl;
        let claims = Claims {
            user: username.to_owned(),
            admin,
            exp: expires_at.timestamp(),
        };
        self.ports.tokens.issue(&claims).map_err(map_codec_error)
    }
}

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::Duplicate { field } if field == "email" => {
            Error::duplicate("email", "Email already registered")
        }
        AccountRepositoryError::Duplicate { field } => {
            Error::duplicate(&field, "Username already exists")
        }
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_codec_error(error: TokenCodecError) -> Error {
    match error {
        TokenCodecError::Expired => Error::unauthorized("Token has expired"),
        TokenCodecError::Invalid { .. } => Error::unauthorized("Token is invalid"),
        TokenCodecError::Encoding { message } => {
            Error::internal(format!("token could not be issued: {message}"))
        }
    }
}

fn map_blacklist_error(error: TokenBlacklistError) -> Error {
    match error {
        TokenBlacklistError::Connection { message } => {
            Error::service_unavailable(format!("token blacklist unavailable: {message}"))
        }
        TokenBlacklistError::Query { message } => {
            Error::internal(format!("token blacklist error: {message}"))
        }
    }
}

fn expiry(claims: &Claims) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| Error::unauthorized("Token is invalid"))
}

#[async_trait]
impl AuthGate for AccountService {
    async fn register(&self, registration: Registration) -> Result<IssuedToken, Error> {
        let existing = self
            .ports
            .accounts
            .find_by_username(registration.username())
            .await
            .map_err(map_account_error)?;
        if existing.is_some() {
            return Err(Error::duplicate("username", "Username already exists"));
        }

        let is_admin = registration.wants_admin() && self.policy.allow_admin_registration;
        if registration.wants_admin() && !is_admin {
            warn!(
                username = registration.username(),
                "admin registration requested but disabled; creating a regular account"
            );
        }

        let password_hash = self
            .ports
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;
        let account = Account {
            username: registration.username().to_owned(),
            email: registration.email().to_owned(),
            name: registration.name().to_owned(),
            password_hash,
            is_admin,
            created_at: self.clock.utc(),
        };
        self.ports
            .accounts
            .insert(&account)
            .await
            .map_err(map_account_error)?;
        info!(username = %account.username, is_admin, "account registered");

        let token = self.issue(&account.username, is_admin)?;
        Ok(IssuedToken {
            token,
            username: account.username,
            email: account.email,
            name: account.name,
        })
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<IssuedToken, Error> {
        let account = self
            .ports
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        let verified = self
            .ports
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.issue(&account.username, account.is_admin)?;
        Ok(IssuedToken {
            token,
            username: account.username,
            email: account.email,
            name: account.name,
        })
    }

    async fn authenticate(&self, token: &str) -> Result<Principal, Error> {
        let claims = self.ports.tokens.decode(token).map_err(map_codec_error)?;
        let revoked = self
            .ports
            .blacklist
            .is_revoked(token)
            .await
            .map_err(map_blacklist_error)?;
        if revoked {
            return Err(Error::unauthorized("Token has been revoked"));
        }
        Ok(Principal {
            expires_at: expiry(&claims)?,
            username: claims.user,
            is_admin: claims.admin,
            token: token.to_owned(),
        })
    }

    async fn logout(&self, principal: &Principal) -> Result<(), Error> {
        self.ports
            .blacklist
            .revoke(&principal.token, principal.expires_at)
            .await
            .map_err(map_blacklist_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
