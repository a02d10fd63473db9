//! Trace-level aggregation over flat span rows
//!
//! The backend paginates flat rows only, so listing traces means
//! fetching a widened row window, grouping rows by trace ID, picking
//! each group's root span, and paginating the resulting groups here.

use std::collections::HashMap;

use crate::config::DEFAULT_OVER_FETCH_FACTOR;
use crate::search::client::{SearchClient, SearchError};
use crate::search::query::{overview_query, trace_query};
use crate::trace::model::{OverviewParams, Span, TraceOverview, TraceParams};

/// Read-side service combining query construction, backend access and
/// trace grouping
#[derive(Debug, Clone)]
pub struct TraceReader {
    client: SearchClient,
    over_fetch_factor: usize,
}

/// One page of trace overviews
///
/// `total` counts the trace groups found inside the widened fetch
/// window, not the true number of matching traces in the backend; it is
/// exact only while every matching span fits in `limit * factor` rows.
#[derive(Debug)]
pub struct TracePage {
    pub traces: Vec<TraceOverview>,
    pub total: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("No spans found for trace '{trace_id}'")]
    TraceNotFound { trace_id: String },
}

impl TraceReader {
    pub fn new(client: SearchClient) -> Self {
        Self {
            client,
            over_fetch_factor: DEFAULT_OVER_FETCH_FACTOR,
        }
    }

    pub fn with_over_fetch_factor(mut self, factor: usize) -> Self {
        self.over_fetch_factor = factor;
        self
    }

    /// List traces matching the filters, one overview per trace
    pub async fn overview(&self, params: &OverviewParams) -> Result<TracePage, QueryError> {
        // Widen the row window; trace-group pagination happens after
        // grouping, so the row fetch always starts at zero
        let fetch = OverviewParams {
            limit: params.limit.saturating_mul(self.over_fetch_factor),
            offset: 0,
            ..params.clone()
        };

        let response = self.client.search(&overview_query(&fetch)).await?;
        let spans: Vec<Span> = response
            .hits
            .hits
            .iter()
            .map(|hit| Span::from_source(&hit.source))
            .collect();

        let overviews = group_overviews(&spans);
        let total = overviews.len();
        let traces = paginate(overviews, params.limit, params.offset);

        Ok(TracePage { traces, total })
    }

    /// Fetch every span of one trace
    pub async fn trace(&self, params: &TraceParams) -> Result<Vec<Span>, QueryError> {
        let response = self.client.search(&trace_query(params)).await?;
        let spans: Vec<Span> = response
            .hits
            .hits
            .iter()
            .map(|hit| Span::from_source(&hit.source))
            .collect();

        if spans.is_empty() {
            return Err(QueryError::TraceNotFound {
                trace_id: params.trace_id.clone(),
            });
        }

        Ok(spans)
    }
}

/// Group spans by trace ID and build one overview per rooted group
///
/// The first span in fetch order with an empty parent ID wins as the
/// group's root; groups without any root are dropped. Overviews are
/// always ordered by start-time string, newest first, regardless of the
/// row-fetch sort order.
pub fn group_overviews(spans: &[Span]) -> Vec<TraceOverview> {
    let mut seen_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, (Option<&Span>, usize)> = HashMap::new();

    for span in spans {
        if span.trace_id.is_empty() {
            continue;
        }
        if !groups.contains_key(span.trace_id.as_str()) {
            seen_order.push(span.trace_id.as_str());
        }
        let entry = groups.entry(span.trace_id.as_str()).or_insert((None, 0));
        entry.1 += 1;
        if entry.0.is_none() && span.is_root() {
            entry.0 = Some(span);
        }
    }

    let mut overviews: Vec<TraceOverview> = seen_order
        .iter()
        .filter_map(|trace_id| {
            let (root, span_count) = groups[trace_id];
            root.map(|root| TraceOverview::from_root(root, span_count))
        })
        .collect();

    overviews.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    overviews
}

/// Clamped slice over the sorted overview list
fn paginate(overviews: Vec<TraceOverview>, limit: usize, offset: usize) -> Vec<TraceOverview> {
    overviews.into_iter().skip(offset).take(limit).collect()
}
