//! Binary entrypoint for the dsaviz HTTP server.
//!
//! Reads configuration from environment variables (see
//! [`ServerConfig::from_lookup`]); `INTERNAL_API_URL` is required and
//! `DSAVIZ_PORT` defaults to 3000. Log filtering follows `RUST_LOG`.

use std::process;

use dsaviz_server::config::{ConfigError, ServerConfig};
use dsaviz_server::llm_provider::UpstreamError;
use dsaviz_server::router::build_router;
use dsaviz_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build upstream client: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        tracing::error!("{}", err);
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let state = AppState::new(&config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("dsaviz server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
