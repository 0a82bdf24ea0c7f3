//! Permadmin Server — application entry point.

mod config;

use anyhow::Context;
use permadmin_api::AppState;
use permadmin_store::{MemoryStore, SeedData};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_json);

    tracing::info!("Starting permadmin server...");

    let seed = match &config.seed_file {
        Some(path) => SeedData::from_file(path)
            .with_context(|| format!("loading seed file {}", path.display()))?,
        None if config.demo_data => SeedData::demo(),
        None => SeedData::catalog_only(),
    };
    let store = MemoryStore::from_seed(seed).context("seeding store")?;

    let app = permadmin_api::router(AppState::new(&store));
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Permadmin server stopped.");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,permadmin=debug,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
