//! Spyglass: read-only trace query facade
//!
//! A thin HTTP service in front of an Elasticsearch-style span store.
//! The backend only knows flat span rows; Spyglass turns them back into
//! traces at query time.
//!
//! # Endpoints
//!
//! - `GET /api/traces`: list traces matching scope and time filters,
//!   one overview per trace (root span, duration, span count)
//! - `GET /api/traces/{trace_id}`: every span of one trace
//! - `GET /health`: backend reachability probe
//!
//! # How trace listing works
//!
//! The backend paginates rows, not traces, so a listing request fetches
//! a row window widened by a configurable factor, groups the rows by
//! trace ID, keeps the groups with an identifiable root span, and
//! paginates the groups. The returned total counts groups inside that
//! window, so it is approximate once the matching data outgrows
//! `limit * factor` rows.
//!
//! # Example
//!
//! ```no_run
//! use spyglass::config::BackendConfig;
//! use spyglass::search::SearchClient;
//! use spyglass::trace::{OverviewParams, TraceReader};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SearchClient::new(&BackendConfig::default());
//! let reader = TraceReader::new(client);
//!
//! let page = reader
//!     .overview(&OverviewParams {
//!         component_id: "checkout".to_string(),
//!         limit: 10,
//!         ..OverviewParams::default()
//!     })
//!     .await?;
//! println!("{} traces", page.total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod search;
pub mod trace;

// Re-export commonly used types
pub use config::{BackendConfig, Config};
pub use search::{SearchClient, SearchError};
pub use trace::{QueryError, Span, TraceOverview, TracePage, TraceReader};
