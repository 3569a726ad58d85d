//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `FOOD_PLACES_*` environment variables and
//! configuration files. Absent values fall back to the defaults exposed by
//! the accessor methods.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:2000";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:2000";
const MIN_SECRET_LEN: usize = 32;
const EPHEMERAL_SECRET_BYTES: usize = 32;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing signing secret.
    Debug,
    /// Release builds require an explicit signing secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while validating configuration values.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The signing secret is required outside debug builds.
    #[error("FOOD_PLACES_JWT_SECRET must be set in release builds")]
    MissingSecret,
    /// The signing secret is too short to be safe.
    #[error("jwt secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    /// A value is present but unusable.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOOD_PLACES")]
pub struct AppConfig {
    /// Listener address, default `0.0.0.0:2000`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it the in-memory stores are used.
    pub database_url: Option<String>,
    /// Maximum pooled database connections, default 10.
    pub db_pool_max_size: Option<u32>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in minutes, default 30.
    pub token_ttl_minutes: Option<i64>,
    /// Honour `admin: true` at registration.
    #[ortho_config(default = false)]
    pub allow_admin_registration: bool,
    /// Externally visible base URL used in business `url` responses.
    pub public_base_url: Option<String>,
}

impl AppConfig {
    /// The socket address to bind.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
            name: "bind_addr",
            reason: format!("{raw}: {err}"),
        })
    }

    /// The database URL, if one is configured and not blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_pool_max_size(&self) -> u32 {
        self.db_pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Token lifetime.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for non-positive lifetimes.
    pub fn token_ttl(&self) -> Result<TimeDelta, ConfigError> {
        let minutes = self.token_ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        if minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "token_ttl_minutes",
                reason: format!("{minutes} is not positive"),
            });
        }
        TimeDelta::try_minutes(minutes).ok_or_else(|| ConfigError::Invalid {
            name: "token_ttl_minutes",
            reason: format!("{minutes} is out of range"),
        })
    }

    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
    }

    /// The token signing secret.
    ///
    /// Debug builds without a configured secret get a random one, which
    /// invalidates every token on restart.
    ///
    /// # Errors
    /// Release builds fail without a secret; any configured secret must be
    /// at least 32 bytes.
    pub fn signing_secret(&self, mode: BuildMode) -> Result<Zeroizing<Vec<u8>>, ConfigError> {
        match self.jwt_secret.as_deref() {
            Some(secret) if secret.len() >= MIN_SECRET_LEN => {
                Ok(Zeroizing::new(secret.as_bytes().to_vec()))
            }
            Some(secret) => Err(ConfigError::SecretTooShort {
                length: secret.len(),
                min_len: MIN_SECRET_LEN,
            }),
            None if mode == BuildMode::Debug => {
                warn!("using an ephemeral jwt secret (dev only)");
                Ok(ephemeral_secret())
            }
            None => Err(ConfigError::MissingSecret),
        }
    }
}

fn ephemeral_secret() -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_BYTES]);
    rand::thread_rng().fill_bytes(&mut bytes);
    Zeroizing::new(hex::encode(bytes.as_slice()).into_bytes())
}
