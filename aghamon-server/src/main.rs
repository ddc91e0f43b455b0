//! Aghamon - web dashboard for AdGuard Home

mod adguard;
mod assets;
mod server;
mod views;

use adguard::AdguardClient;
use aghamon_common::AghamonConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state, immutable after startup
pub struct AppState {
    pub adguard: AdguardClient,
    pub port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aghamon=info".parse()?),
        )
        .init();

    info!("Starting Aghamon v{}", env!("CARGO_PKG_VERSION"));

    // Environment overrides
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "./config.yaml".to_string());
    let port: u16 = match std::env::var("PORT") {
        Ok(value) => value.parse().context("invalid PORT value")?,
        Err(_) => 8080,
    };

    // Load configuration; any failure here is fatal
    info!("Loading configuration from {}", config_path);
    let config = AghamonConfig::load(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;
    info!("Monitoring AdGuard Home at {}", config.adguard.server_url);

    // Create shared state
    let state = Arc::new(AppState {
        adguard: AdguardClient::new(config.adguard),
        port,
    });

    // Start HTTP server
    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::run_server(server_state).await {
            error!("HTTP server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        result = server_handle => {
            if let Err(e) = result {
                error!("Server task failed: {}", e);
            }
        }
    }

    info!("Aghamon shutdown complete");
    Ok(())
}
