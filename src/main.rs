//! Freight exchange HTTP server.

use anyhow::Context;
use freight_exchange::api::rest::{AppState, create_router};
use freight_exchange::application::services::FreightServices;
use freight_exchange::config::AppConfig;
use freight_exchange::infrastructure::persistence::InMemoryFreightStore;
use freight_exchange::telemetry;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config = AppConfig::load().context("loading configuration")?;
    telemetry::init(&config.logging).context("initialising logging")?;

    let services = FreightServices::new(
        Arc::new(InMemoryFreightStore::new()),
        Arc::new(config.ranking.strategy()),
    );
    tracing::info!(
        strategy = services.ranking.strategy_name(),
        rate_weight = config.ranking.rate_weight,
        rating_weight = config.ranking.rating_weight,
        "services ready"
    );

    let state = Arc::new(AppState::new(services, config.pagination));
    let router = create_router(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "freight exchange listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
