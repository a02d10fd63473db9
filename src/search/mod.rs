//! Query construction and backend access

pub mod client;
pub mod query;

pub use client::{SearchClient, SearchError, SearchResponse};
pub use query::{overview_query, trace_query};
