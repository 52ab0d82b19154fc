//! Taxbook API Server
//!
//! Main entry point for the Taxbook backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taxbook_api::{AppState, create_router};
use taxbook_db::{InMemoryStore, SharedStore};
use taxbook_shared::{AppConfig, JwtService, StoreBackend};

async fn open_store(config: &AppConfig) -> anyhow::Result<SharedStore> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::Database => {
            let url = config
                .store
                .url
                .as_deref()
                .context("store.url is required for the database backend")?;
            let store = taxbook_db::connect(url, config.store.max_connections).await?;
            info!(
                max_connections = config.store.max_connections,
                "Connected to database and applied migrations"
            );
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let store = open_store(&config).await?;
    let state = AppState::new(
        store,
        JwtService::new(&config.jwt.secret),
        config.tax.clone(),
    );
    info!(
        legacy_year = config.tax.legacy_year,
        rent_exemption = %config.tax.rent_exemption,
        tax_rate = %config.tax.tax_rate,
        "Tax defaults loaded"
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
