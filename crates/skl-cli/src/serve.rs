//! # Serve Subcommand
//!
//! Runs the Axum HTTP server. Configuration comes from the environment:
//! `PORT`, `SKLADNO_AUTH_TOKEN`, `SKLADNO_METRICS_ENABLED`, and
//! `DATABASE_URL` (optional — absent means in-memory only).

use anyhow::{Context, Result};
use clap::Args;

use skl_api::state::{AppConfig, AppState};

/// Arguments for the `skladno serve` subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {}

/// Execute the serve subcommand. Blocks until the server exits.
pub fn run_serve(_args: &ServeArgs) -> Result<u8> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(serve())?;
    Ok(0)
}

async fn serve() -> Result<()> {
    let config = AppConfig::from_env();
    let port = config.port;

    // Install the Prometheus recorder before any requests are handled.
    if config.metrics_enabled {
        skl_api::metrics::prometheus_handle();
    }

    // Initialize database pool (optional — absent means in-memory only).
    let db_pool = skl_store::db::init_pool()
        .await
        .context("database initialization failed")?;

    let state = AppState::new(config, db_pool);

    // Hydrate the in-memory store from the database (if connected).
    state
        .hydrate_from_db()
        .await
        .context("database hydration failed")?;

    let app = skl_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Skladno API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
