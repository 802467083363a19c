//! Velan marketplace API server.

use std::sync::Arc;

use api::{AppState, Config};
use database::Database;
use marketplace_core::{Marketplace, SqliteStore};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,marketplace_core=info,tower_http=info".into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        addr = %config.addr,
        concurrency = config.market.dispatch.concurrency,
        retention = ?config.market.retention,
        "Starting marketplace API"
    );

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let store = Arc::new(SqliteStore::new(db));
    let market = Marketplace::new(store, config.market);
    let app = api::app(AppState::new(market));

    // Start server
    info!(addr = %config.addr, "Marketplace API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
