//! Spyglass Server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - SPYGLASS_HOST: Bind address (default: 0.0.0.0)
//! - SPYGLASS_PORT: Port number (default: 8080)
//! - SPYGLASS_BACKEND_URL: Search backend base URL (default: http://localhost:9200)
//! - SPYGLASS_BACKEND_USERNAME / SPYGLASS_BACKEND_PASSWORD: Basic-auth credentials (optional)
//! - SPYGLASS_INDEX: Index holding span documents (default: spans)
//! - SPYGLASS_OVERFETCH_FACTOR: Row-window multiplier for trace listing (default: 50)
//! - RUST_LOG: Log level (default: info)

use spyglass::api::run_server;
use spyglass::config::Config;
use spyglass::search::SearchClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spyglass=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Spyglass configuration:");
    tracing::info!("  Host: {}:{}", config.host, config.port);
    tracing::info!("  Backend: {}", config.backend.url);
    tracing::info!("  Index: {}", config.backend.index);
    tracing::info!("  Over-fetch factor: x{}", config.over_fetch_factor);

    let client = SearchClient::new(&config.backend);

    // The only failure allowed to abort the process: an unreachable
    // backend at startup
    match client.ping().await {
        Ok(true) => tracing::info!("Backend reachable"),
        Ok(false) => return Err("backend responded with a failure status".into()),
        Err(e) => return Err(format!("backend unreachable: {}", e).into()),
    }

    run_server(&config, client).await
}
