//! Backend query document construction
//!
//! Pure functions translating caller filters into the backend's
//! boolean query DSL. Every non-empty scope filter becomes one `term`
//! clause under `bool.must`; omitted filters contribute nothing.

use serde_json::{json, Value};

use crate::trace::model::{OverviewParams, SortOrder, TraceParams};

/// Document field holding the owning component ID
pub const FIELD_COMPONENT_ID: &str = "componentId";
/// Document field holding the owning project ID
pub const FIELD_PROJECT_ID: &str = "projectId";
/// Document field holding the deployment environment ID
pub const FIELD_ENVIRONMENT_ID: &str = "environmentId";
/// Document field holding the organization ID
pub const FIELD_ORGANIZATION_ID: &str = "organizationId";
/// Document field holding the trace ID
pub const FIELD_TRACE_ID: &str = "traceId";
/// Document field holding the span start timestamp
pub const FIELD_START_TIME: &str = "startTime";

/// Row-fetch page size when an overview query supplies no limit
pub const DEFAULT_OVERVIEW_SIZE: usize = 100;
/// Row-fetch page size when a trace query supplies no limit; sized to
/// cover an entire trace since its final span count is unknown upfront
pub const DEFAULT_TRACE_SIZE: usize = 10_000;

/// Build the row-fetch query for a trace overview listing
pub fn overview_query(params: &OverviewParams) -> Value {
    let mut must = scope_clauses(
        &params.component_id,
        &params.project_id,
        &params.environment_id,
        &params.organization_id,
    );

    // Range clause only when both bounds are present
    if !params.start.is_empty() && !params.end.is_empty() {
        must.push(json!({
            "range": {
                FIELD_START_TIME: {"gte": params.start, "lte": params.end}
            }
        }));
    }

    let size = if params.limit == 0 {
        DEFAULT_OVERVIEW_SIZE
    } else {
        params.limit
    };
    let order = params.order.unwrap_or(SortOrder::Desc);

    json!({
        "query": {"bool": {"must": must}},
        "size": size,
        "from": params.offset,
        "sort": [{FIELD_START_TIME: {"order": order.as_str()}}]
    })
}

/// Build the query fetching every span of one trace
pub fn trace_query(params: &TraceParams) -> Value {
    let mut must = scope_clauses(
        &params.component_id,
        &params.project_id,
        &params.environment_id,
        &params.organization_id,
    );

    // The trace pin is the only unconditional clause
    must.push(json!({"term": {FIELD_TRACE_ID: params.trace_id}}));

    let size = if params.limit == 0 {
        DEFAULT_TRACE_SIZE
    } else {
        params.limit
    };
    let order = params.order.unwrap_or(SortOrder::Asc);

    json!({
        "query": {"bool": {"must": must}},
        "size": size,
        "sort": [{FIELD_START_TIME: {"order": order.as_str()}}]
    })
}

fn scope_clauses(
    component_id: &str,
    project_id: &str,
    environment_id: &str,
    organization_id: &str,
) -> Vec<Value> {
    let mut must = Vec::new();

    for (field, value) in [
        (FIELD_COMPONENT_ID, component_id),
        (FIELD_PROJECT_ID, project_id),
        (FIELD_ENVIRONMENT_ID, environment_id),
        (FIELD_ORGANIZATION_ID, organization_id),
    ] {
        if !value.is_empty() {
            must.push(json!({"term": {field: value}}));
        }
    }

    must
}
