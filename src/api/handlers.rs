use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::search::client::{SearchClient, SearchError};
use crate::trace::aggregate::QueryError;
use crate::trace::model::{OverviewParams, SortOrder, Span, TraceOverview, TraceParams};
use crate::trace::TraceReader;

/// Application state shared across handlers
pub struct AppState {
    pub reader: TraceReader,
    pub client: SearchClient,
}

/// Default overview page size (trace groups, not rows)
const DEFAULT_OVERVIEW_LIMIT: i64 = 10;
/// Default span cap for a single-trace fetch
const DEFAULT_TRACE_LIMIT: i64 = 100;

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.client.ping().await {
        Ok(true) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                version: env!("CARGO_PKG_VERSION"),
                backend: true,
                error: None,
            }),
        ),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                version: env!("CARGO_PKG_VERSION"),
                backend: false,
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                version: env!("CARGO_PKG_VERSION"),
                backend: false,
                error: Some(e.to_string()),
            }),
        ),
    }
}

// ============================================================================
// Trace Overview Listing
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQuery {
    #[serde(default)]
    pub component_id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub environment_id: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order: Option<String>,
}

#[derive(Serialize)]
pub struct OverviewResponse {
    pub traces: Vec<TraceOverview>,
    /// Trace groups found in the widened fetch window; approximate once
    /// the true match count exceeds it
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

pub async fn list_traces(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let limit = validate_limit(query.limit, DEFAULT_OVERVIEW_LIMIT)?;
    let offset = validate_offset(query.offset)?;
    let order = validate_order(query.order.as_deref())?;

    let params = OverviewParams {
        component_id: query.component_id,
        project_id: query.project_id,
        environment_id: query.environment_id,
        organization_id: query.organization_id,
        start: query.start,
        end: query.end,
        limit,
        offset,
        order: Some(order),
    };

    let page = state.reader.overview(&params).await?;

    Ok(Json(OverviewResponse {
        traces: page.traces,
        total: page.total,
        limit,
        offset,
    }))
}

// ============================================================================
// Single-Trace Retrieval
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceQuery {
    #[serde(default)]
    pub component_id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub environment_id: String,
    #[serde(default)]
    pub organization_id: String,
    pub limit: Option<i64>,
    pub order: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceResponse {
    pub trace_id: String,
    pub spans: Vec<Span>,
    pub span_count: usize,
}

pub async fn get_trace(
    State(state): State<Arc<AppState>>,
    Path(trace_id): Path<String>,
    Query(query): Query<TraceQuery>,
) -> Result<Json<TraceResponse>, ApiError> {
    if trace_id.is_empty() {
        return Err(ApiError::BadRequest(
            "trace id must not be empty".to_string(),
        ));
    }
    let limit = validate_limit(query.limit, DEFAULT_TRACE_LIMIT)?;
    let order = validate_order(query.order.as_deref())?;

    let params = TraceParams {
        trace_id: trace_id.clone(),
        component_id: query.component_id,
        project_id: query.project_id,
        environment_id: query.environment_id,
        organization_id: query.organization_id,
        limit,
        order: Some(order),
    };

    let spans = state.reader.trace(&params).await?;
    let span_count = spans.len();

    Ok(Json(TraceResponse {
        trace_id,
        spans,
        span_count,
    }))
}

// ============================================================================
// Parameter Validation
// ============================================================================

fn validate_limit(limit: Option<i64>, default: i64) -> Result<usize, ApiError> {
    let limit = limit.unwrap_or(default);
    if limit <= 0 {
        return Err(ApiError::BadRequest(format!(
            "limit must be positive, got {}",
            limit
        )));
    }
    Ok(limit as usize)
}

fn validate_offset(offset: Option<i64>) -> Result<usize, ApiError> {
    let offset = offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::BadRequest(format!(
            "offset must not be negative, got {}",
            offset
        )));
    }
    Ok(offset as usize)
}

fn validate_order(order: Option<&str>) -> Result<SortOrder, ApiError> {
    match order {
        None | Some("") => Ok(SortOrder::Desc),
        Some(s) => SortOrder::parse(s).ok_or_else(|| {
            ApiError::BadRequest(format!("order must be 'asc' or 'desc', got '{}'", s))
        }),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
    Backend(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Search(SearchError::Transport(msg)) => ApiError::Upstream(msg),
            QueryError::Search(SearchError::Backend(msg)) => ApiError::Backend(msg),
            QueryError::TraceNotFound { .. } => ApiError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Backend(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None, 10).unwrap(), 10);
        assert_eq!(validate_limit(Some(25), 10).unwrap(), 25);
        assert!(validate_limit(Some(0), 10).is_err());
        assert!(validate_limit(Some(-1), 10).is_err());
    }

    #[test]
    fn test_validate_offset() {
        assert_eq!(validate_offset(None).unwrap(), 0);
        assert_eq!(validate_offset(Some(50)).unwrap(), 50);
        assert!(validate_offset(Some(-1)).is_err());
    }

    #[test]
    fn test_validate_order() {
        assert_eq!(validate_order(None).unwrap(), SortOrder::Desc);
        assert_eq!(validate_order(Some("")).unwrap(), SortOrder::Desc);
        assert_eq!(validate_order(Some("asc")).unwrap(), SortOrder::Asc);
        assert_eq!(validate_order(Some("desc")).unwrap(), SortOrder::Desc);
        assert!(validate_order(Some("upwards")).is_err());
    }

    #[test]
    fn test_query_error_mapping() {
        let transport: ApiError =
            QueryError::Search(SearchError::Transport("refused".to_string())).into();
        assert!(matches!(transport, ApiError::Upstream(_)));

        let backend: ApiError =
            QueryError::Search(SearchError::Backend("bad query".to_string())).into();
        assert!(matches!(backend, ApiError::Backend(_)));

        let not_found: ApiError = QueryError::TraceNotFound {
            trace_id: "t1".to_string(),
        }
        .into();
        assert!(matches!(not_found, ApiError::NotFound(_)));
    }
}
