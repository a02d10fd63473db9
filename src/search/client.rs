//! HTTP client for the search backend

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::BackendConfig;

/// Client for executing query documents against the backend
#[derive(Debug, Clone)]
pub struct SearchClient {
    http_client: reqwest::Client,
    base_url: String,
    index: String,
    username: Option<String>,
    password: Option<String>,
}

/// Parsed backend search response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    pub hits: HitList,
}

#[derive(Debug, Deserialize)]
pub struct HitList {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct TotalHits {
    pub value: i64,
}

/// One hit: an opaque field bag plus backend metadata we ignore
#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_source", default)]
    pub source: Value,
}

impl SearchClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_timeout(config, Duration::from_secs(30))
    }

    pub fn with_timeout(config: &BackendConfig, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    /// Execute a query document against the configured index
    ///
    /// Never retries; transport and backend failures are both surfaced
    /// to the caller.
    pub async fn search(&self, body: &Value) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/{}/_search", self.base_url, self.index);

        let mut request = self.http_client.post(&url).json(body);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::Backend(error_text));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::Backend(format!("unreadable response: {}", e)))
    }

    /// Check if the backend is reachable
    pub async fn ping(&self) -> Result<bool, SearchError> {
        let mut request = self.http_client.get(&self.base_url);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
