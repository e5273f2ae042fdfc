//! # clientdb-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the environment
//! (see [`AppConfig::from_env`]).

use clientdb_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::debug!(?config, "loaded configuration");

    let state = AppState::from_config(config).map_err(|e| {
        tracing::error!("Failed to load reference data: {e}");
        e
    })?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let app = clientdb_api::app(state);

    tracing::info!("clientdb API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
