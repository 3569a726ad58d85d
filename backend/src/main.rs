//! Backend entry-point: loads configuration, prepares storage and serves the
//! REST API with OpenAPI docs in debug builds.

mod server;

use color_eyre::eyre::{Context, Result};
use food_places::config::{AppConfig, BuildMode};
use food_places::domain::AccountPolicy;
use food_places::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server, health_state};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppConfig::load().wrap_err("failed to load configuration")?;
    let bind_addr = settings.bind_addr()?;
    let signing_secret = settings.signing_secret(BuildMode::from_debug_assertions())?;
    let policy = AccountPolicy {
        token_ttl: settings.token_ttl()?,
        allow_admin_registration: settings.allow_admin_registration,
    };

    let mut config = ServerConfig::new(bind_addr, signing_secret)
        .with_account_policy(policy)
        .with_public_base_url(settings.public_base_url());

    match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .wrap_err("failed to migrate the database")?;
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_pool_max_size()))
                .await
                .wrap_err("failed to build the database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; using in-memory stores"),
    }

    let health = health_state(&config);
    let server = create_server(health.clone(), config)?;
    info!(%bind_addr, "listening");
    let result = server.await;
    health.mark_unhealthy();
    result.wrap_err("server terminated abnormally")
}
