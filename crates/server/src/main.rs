//! Telco TCO server - HTTP host for the TCO plugin
//!
//! Loads the pricing catalog once, then serves analysis, optimization and
//! placement comparison requests alongside health and metrics endpoints.

use anyhow::{Context, Result};
use std::sync::Arc;
use tco_lib::{
    health::HealthRegistry,
    observability::StructuredLogger,
    PricingCatalog, TelcoTcoPlugin,
};
use tco_server::{api, config::ServerConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting tco-server");

    let config = ServerConfig::load()?;
    info!(port = config.port, pricing_file = ?config.pricing_file, "Server configured");

    let catalog = PricingCatalog::load(config.pricing_file.as_deref())
        .context("Failed to load pricing catalog")?;

    let health_registry = HealthRegistry::new();
    health_registry.check_catalog(&catalog).await;

    let logger = StructuredLogger::new(&config.service_name);
    logger.log_startup(SERVER_VERSION, &catalog.version);

    let plugin = TelcoTcoPlugin::new(Arc::new(catalog));
    let app_state = Arc::new(api::AppState::new(plugin, health_registry.clone()));

    health_registry.set_ready(true).await;

    let shutdown_logger = logger.clone();
    let shutdown = async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_logger.log_shutdown("SIGINT received");
        }
    };

    api::serve(&config.bind_addr(), app_state, shutdown).await?;
    info!("Shutting down");

    Ok(())
}
