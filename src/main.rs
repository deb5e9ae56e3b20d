use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use rocketshoes_cart::{
    create_app, init_observability,
    repositories::{FileStore, HttpApiClient},
    services::{CartStore, TracingNotifier},
    Config, Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment().context("Failed to load configuration")?;

    init_observability(
        &config.observability.service_name,
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Store API: {}", config.api.api_base_url);
    info!(
        "Cart storage: {} (key {})",
        config.storage.storage_dir.display(),
        config.storage.cart_key
    );

    let metrics = Arc::new(Metrics::new()?);

    let api_client = Arc::new(
        HttpApiClient::new(&config.api.api_base_url, config.api.timeout())
            .context("Failed to build store API client")?,
    );
    let storage = Arc::new(
        FileStore::open(&config.storage.storage_dir).context("Failed to open cart storage")?,
    );

    let cart_store = CartStore::load(
        api_client.clone(),
        api_client,
        storage,
        Arc::new(TracingNotifier),
        config.storage.cart_key.clone(),
    )
    .context("Failed to load persisted cart")?
    .with_metrics(metrics.clone());
    info!("Cart store initialized successfully");

    let app = create_app(Arc::new(cart_store), metrics).layer(
        tower_http::timeout::TimeoutLayer::new(config.server.request_timeout()),
    );

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid server host")?,
        config.server.port,
    );
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
