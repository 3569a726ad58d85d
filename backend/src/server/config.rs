//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use food_places::domain::AccountPolicy;
use food_places::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) signing_secret: Zeroizing<Vec<u8>>,
    pub(crate) account_policy: AccountPolicy,
    pub(crate) public_base_url: String,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration backed by the in-memory stores.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, signing_secret: Zeroizing<Vec<u8>>) -> Self {
        Self {
            bind_addr,
            signing_secret,
            account_policy: AccountPolicy::default(),
            public_base_url: format!("http://{bind_addr}"),
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, every store is backed by PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override token lifetime and admin self-registration.
    #[must_use]
    pub fn with_account_policy(mut self, policy: AccountPolicy) -> Self {
        self.account_policy = policy;
        self
    }

    /// Set the externally visible base URL used in business responses.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }
}
