//! OrgHub Server: organization and membership backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use orghub_api::AppState;
use orghub_auth::{AuthorizationServer, HydraClient, IdentityProvider, KratosClient};
use orghub_core::config::AppConfig;
use orghub_database::migration::run_migrations;
use orghub_database::{DatabasePool, OrganizationStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("ORGHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("Failed to load configuration")?;

    init_logging(&config);
    tracing::info!(env = %env, version = env!("CARGO_PKG_VERSION"), "Starting OrgHub");

    run(config).await
}

/// Initialize tracing/logging. `RUST_LOG` overrides the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let db = DatabasePool::connect(&config.database)
        .await
        .context("Failed to connect to the database")?;

    if config.database.run_migrations {
        run_migrations(db.pool())
            .await
            .context("Failed to run migrations")?;
    }

    let store: Arc<dyn OrganizationStore> = Arc::new(PgStore::new(db.pool().clone()));
    let identity: Arc<dyn IdentityProvider> = Arc::new(
        KratosClient::new(&config.identity).context("Failed to build identity provider client")?,
    );
    let authorization: Arc<dyn AuthorizationServer> = Arc::new(
        HydraClient::new(&config.authorization_server)
            .context("Failed to build authorization server client")?,
    );

    let state = AppState::new(config, store, identity, authorization)
        .context("Failed to initialize services")?;

    let result = orghub_api::serve(state).await;

    db.close().await;
    result.context("Server error")
}
