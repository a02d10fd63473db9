use serde::{Deserialize, Serialize};

/// Service configuration, resolved once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
    /// Backend configuration
    pub backend: BackendConfig,
    /// Multiplier applied to the requested page size when fetching raw
    /// span rows for overview queries
    pub over_fetch_factor: usize,
}

/// Connection settings for the search backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. "http://localhost:9200"
    pub url: String,
    /// Basic-auth username (passed through unchanged)
    pub username: Option<String>,
    /// Basic-auth password (passed through unchanged)
    pub password: Option<String>,
    /// Index holding span documents
    pub index: String,
}

/// Default page-size multiplier for overview row fetches
pub const DEFAULT_OVER_FETCH_FACTOR: usize = 50;

impl Config {
    /// Load configuration from environment variables
    /// SPYGLASS_HOST=0.0.0.0
    /// SPYGLASS_PORT=8080
    /// SPYGLASS_BACKEND_URL=http://localhost:9200
    /// SPYGLASS_BACKEND_USERNAME / SPYGLASS_BACKEND_PASSWORD (optional)
    /// SPYGLASS_INDEX=spans
    /// SPYGLASS_OVERFETCH_FACTOR=50
    pub fn from_env() -> Self {
        let host = std::env::var("SPYGLASS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("SPYGLASS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let over_fetch_factor = std::env::var("SPYGLASS_OVERFETCH_FACTOR")
            .ok()
            .and_then(|f| f.parse::<usize>().ok())
            .filter(|f| *f > 0)
            .unwrap_or(DEFAULT_OVER_FETCH_FACTOR);

        Self {
            host,
            port,
            backend: BackendConfig::from_env(),
            over_fetch_factor,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backend: BackendConfig::default(),
            over_fetch_factor: DEFAULT_OVER_FETCH_FACTOR,
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Self {
        let url = std::env::var("SPYGLASS_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:9200".to_string());
        let username = std::env::var("SPYGLASS_BACKEND_USERNAME").ok();
        let password = std::env::var("SPYGLASS_BACKEND_PASSWORD").ok();
        let index = std::env::var("SPYGLASS_INDEX").unwrap_or_else(|_| "spans".to_string());

        Self {
            url,
            username,
            password,
            index,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            username: None,
            password: None,
            index: "spans".to_string(),
        }
    }
}
