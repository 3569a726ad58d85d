//! Builders wiring domain services to PostgreSQL or in-memory adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use food_places::domain::ports::{
    AccountRepository, BusinessRepository, CityRepository, TokenBlacklist,
};
use food_places::domain::{AccountPorts, AccountService, BusinessService, CatalogueService};
use food_places::inbound::http::health::StorageBackend;
use food_places::inbound::http::state::{HttpState, HttpStatePorts};
use food_places::outbound::memory::{
    MemoryAccountRepository, MemoryBusinessRepository, MemoryCityRepository,
    MemoryTokenBlacklist,
};
use food_places::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselBusinessRepository, DieselCityRepository,
    DieselTokenBlacklist,
};
use food_places::outbound::security::{Argon2Hasher, JwtCodec};

use super::ServerConfig;

/// Driven adapters chosen for one storage backend.
struct Stores {
    cities: Arc<dyn CityRepository>,
    businesses: Arc<dyn BusinessRepository>,
    accounts: Arc<dyn AccountRepository>,
    blacklist: Arc<dyn TokenBlacklist>,
}

fn postgres_stores(pool: &DbPool) -> Stores {
    Stores {
        cities: Arc::new(DieselCityRepository::new(pool.clone())),
        businesses: Arc::new(DieselBusinessRepository::new(pool.clone())),
        accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
        blacklist: Arc::new(DieselTokenBlacklist::new(pool.clone())),
    }
}

fn memory_stores(clock: Arc<dyn Clock>) -> Stores {
    Stores {
        cities: Arc::new(MemoryCityRepository::new()),
        businesses: Arc::new(MemoryBusinessRepository::new()),
        accounts: Arc::new(MemoryAccountRepository::new()),
        blacklist: Arc::new(MemoryTokenBlacklist::new(clock)),
    }
}

/// Which backend the configuration selects.
pub(super) fn storage_backend(config: &ServerConfig) -> StorageBackend {
    if config.db_pool.is_some() {
        StorageBackend::Postgres
    } else {
        StorageBackend::Memory
    }
}

/// Build the HTTP state from configuration.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let stores = match &config.db_pool {
        Some(pool) => postgres_stores(pool),
        None => memory_stores(clock.clone()),
    };
    let catalogue = Arc::new(CatalogueService::new(stores.cities, clock.clone()));
    let auth = AccountService::new(
        AccountPorts {
            accounts: stores.accounts,
            hasher: Arc::new(Argon2Hasher::new()),
            tokens: Arc::new(JwtCodec::new(&config.signing_secret)),
            blacklist: stores.blacklist,
        },
        clock,
        config.account_policy,
    );
    HttpState::new(
        HttpStatePorts {
            catalogue_query: catalogue.clone(),
            catalogue_command: catalogue,
            businesses: Arc::new(BusinessService::new(stores.businesses)),
            auth: Arc::new(auth),
        },
        config.public_base_url.clone(),
    )
}
