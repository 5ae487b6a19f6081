//! Pitaka API Server
//!
//! Main entry point for the kiosk ledger service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pitaka_api::{AppState, create_router};
use pitaka_core::LedgerService;
use pitaka_core::storage::{LedgerStore, SnapshotStore};
use pitaka_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pitaka=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration (also reads .env)
    let config = AppConfig::load().context("failed to load configuration")?;
    let tz = config.ledger.tz()?;

    // Open snapshot storage and restore the ledgers
    let store = SnapshotStore::from_settings(&config.storage)?;
    info!(
        provider = store.provider_name(),
        key = store.key(),
        "Snapshot storage configured"
    );
    let store: Arc<dyn LedgerStore> = Arc::new(store);
    let ledger = LedgerService::open(store, tz)
        .await
        .context("failed to restore ledger state")?;
    info!(
        next_transaction_number = ledger.next_transaction_number().await,
        timezone = %tz,
        "Ledgers ready"
    );

    if config.ledger.allow_reset {
        info!("Reset endpoint is enabled");
    }

    // Create router
    let state = AppState::new(Arc::new(ledger), config.ledger.allow_reset);
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
