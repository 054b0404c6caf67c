//! # hsds-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the HSDS validator.
//! Binds to configurable port (default 8080).

use hsds_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration failed: {e}");
        e
    })?;
    let port = config.port;
    tracing::info!(
        strategy = ?config.engine.strategy,
        concurrency = config.engine.concurrency,
        body_limit_bytes = config.body_limit_bytes,
        "configuration loaded"
    );

    let app = hsds_api::app(AppState::with_config(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("HSDS API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
