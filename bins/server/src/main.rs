//! Cash box ledger server.
//!
//! Main entry point for the ledger HTTP service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cashbox_api::{AppState, create_router};
use cashbox_core::ledger::{LedgerRepository, LedgerStore};
use cashbox_db::{TransactionRepository, connect_with};
use cashbox_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashbox=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    let repository = TransactionRepository::new(db);
    // Refuse to serve without storage.
    repository
        .ping()
        .await
        .context("ledger storage unreachable")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let store = LedgerStore::new(repository).with_write_timeout(config.ledger.write_timeout());
    let state = AppState::new(store);

    if let Some(interval) = config.ledger.audit_interval() {
        tokio::spawn(audit_loop(Arc::clone(&state.store), interval));
        info!(interval_secs = interval.as_secs(), "Periodic ledger audit enabled");
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Audits the ledger on a fixed interval and rewrites stale balances.
async fn audit_loop<R: LedgerRepository>(store: Arc<LedgerStore<R>>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // The first tick fires immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let report = match store.audit().await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Ledger audit failed");
                continue;
            }
        };
        if report.stale_balances.is_empty() {
            continue;
        }
        match store.repair_balances().await {
            Ok(repaired) => warn!(repaired, "Stale running balances repaired"),
            Err(e) => error!(error = %e, "Balance repair failed"),
        }
    }
}
