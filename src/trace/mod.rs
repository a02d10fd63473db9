//! Trace reconstruction from flat span rows
//!
//! The backend stores and paginates individual spans; everything
//! trace-shaped (grouping, root selection, per-trace pagination) is
//! derived here at query time.

pub mod aggregate;
pub mod model;

pub use aggregate::{QueryError, TracePage, TraceReader};
pub use model::{OverviewParams, SortOrder, Span, TraceOverview, TraceParams};
