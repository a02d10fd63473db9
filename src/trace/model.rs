//! Span and trace-overview data model

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Sort direction for the backend row fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Parse a caller-supplied order string; empty means "use the default"
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// One unit of trace telemetry, parsed from a backend hit source
///
/// Every field is best-effort: a source missing a field, or carrying it
/// with an unexpected type, yields the zero value for that field. No
/// source is ever rejected outright.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// 32 hex character trace ID
    pub trace_id: String,
    /// 16 hex character span ID
    pub span_id: String,
    /// Parent span ID (empty string if root)
    pub parent_span_id: String,
    /// Operation name
    pub name: String,
    /// Span kind
    pub kind: String,
    /// Status code, rendered as a string even when the source holds a number
    pub status: String,
    /// Service name from resource attributes (flat-field fallback)
    pub service: String,
    /// Start time with nanosecond resolution
    pub start_time: DateTime<Utc>,
    /// End time with nanosecond resolution
    pub end_time: DateTime<Utc>,
    /// Duration in nanoseconds
    pub duration_nanos: i64,
    /// Free-form span attributes
    pub attributes: HashMap<String, Value>,
    /// Free-form resource attributes
    pub resource: HashMap<String, Value>,
}

impl Span {
    /// Parse a span out of a schema-less hit source
    pub fn from_source(source: &Value) -> Self {
        let resource = map_field(source, "resource");

        // Prefer the nested resource attribute, fall back to the flat field
        let service = resource
            .get("service.name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| str_field(source, "serviceName"));

        Self {
            trace_id: str_field(source, "traceId"),
            span_id: str_field(source, "spanId"),
            parent_span_id: str_field(source, "parentSpanId"),
            name: str_field(source, "name"),
            kind: text_field(source, "kind"),
            status: text_field(source, "statusCode"),
            service,
            start_time: time_field(source, "startTime"),
            end_time: time_field(source, "endTime"),
            duration_nanos: i64_field(source, "durationNano"),
            attributes: map_field(source, "attributes"),
            resource,
        }
    }

    /// A span with no parent is the entry point of its trace
    pub fn is_root(&self) -> bool {
        self.parent_span_id.is_empty()
    }
}

/// Derived per-trace summary, built from the group's root span
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceOverview {
    pub trace_id: String,
    pub root_span_id: String,
    pub root_span_name: String,
    /// RFC 3339 with nanosecond precision
    pub start_time: String,
    /// RFC 3339 with nanosecond precision
    pub end_time: String,
    pub duration_nanos: i64,
    /// Total spans sharing this trace ID, root included
    pub span_count: usize,
}

impl TraceOverview {
    pub fn from_root(root: &Span, span_count: usize) -> Self {
        Self {
            trace_id: root.trace_id.clone(),
            root_span_id: root.span_id.clone(),
            root_span_name: root.name.clone(),
            start_time: format_time(root.start_time),
            end_time: format_time(root.end_time),
            duration_nanos: root.duration_nanos,
            span_count,
        }
    }
}

fn format_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Filters and pagination for the trace overview listing
#[derive(Debug, Clone, Default)]
pub struct OverviewParams {
    pub component_id: String,
    pub project_id: String,
    pub environment_id: String,
    /// Optional; empty means "no organization clause"
    pub organization_id: String,
    /// Inclusive lower time bound (RFC 3339); empty disables the range clause
    pub start: String,
    /// Inclusive upper time bound (RFC 3339); empty disables the range clause
    pub end: String,
    pub limit: usize,
    pub offset: usize,
    /// Row-fetch sort order; defaults to descending when unset
    pub order: Option<SortOrder>,
}

/// Filters for fetching all spans of one trace
#[derive(Debug, Clone, Default)]
pub struct TraceParams {
    pub trace_id: String,
    pub component_id: String,
    pub project_id: String,
    pub environment_id: String,
    /// Optional; empty means "no organization clause"
    pub organization_id: String,
    pub limit: usize,
    /// Row-fetch sort order; defaults to ascending when unset
    pub order: Option<SortOrder>,
}

fn str_field(source: &Value, key: &str) -> String {
    source
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Like `str_field`, but renders a numeric value to its decimal string
fn text_field(source: &Value, key: &str) -> String {
    match source.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn i64_field(source: &Value, key: &str) -> i64 {
    match source.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Accepts RFC 3339 strings or integer epoch nanoseconds
fn time_field(source: &Value, key: &str) -> DateTime<Utc> {
    match source.get(key) {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(DateTime::from_timestamp_nanos)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        _ => DateTime::<Utc>::UNIX_EPOCH,
    }
}

fn map_field(source: &Value, key: &str) -> HashMap<String, Value> {
    source
        .get(key)
        .and_then(Value::as_object)
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_source() {
        let source = json!({
            "traceId": "abc123",
            "spanId": "def456",
            "parentSpanId": "aaa111",
            "name": "GET /api",
            "kind": "SERVER",
            "statusCode": "OK",
            "serviceName": "flat-service",
            "resource": {"service.name": "checkout", "host.name": "web-1"},
            "startTime": "2024-03-01T12:00:00.000000001Z",
            "endTime": "2024-03-01T12:00:00.500000001Z",
            "durationNano": 500_000_000i64,
            "attributes": {"http.method": "GET"}
        });

        let span = Span::from_source(&source);
        assert_eq!(span.trace_id, "abc123");
        assert_eq!(span.span_id, "def456");
        assert_eq!(span.parent_span_id, "aaa111");
        assert!(!span.is_root());
        assert_eq!(span.name, "GET /api");
        assert_eq!(span.duration_nanos, 500_000_000);
        // Nested resource attribute wins over the flat field
        assert_eq!(span.service, "checkout");
        assert_eq!(span.start_time.timestamp_subsec_nanos(), 1);
        assert_eq!(
            span.attributes.get("http.method"),
            Some(&json!("GET"))
        );
    }

    #[test]
    fn test_missing_parent_is_root_eligible() {
        let source = json!({"traceId": "t1", "spanId": "s1"});
        let span = Span::from_source(&source);
        assert_eq!(span.parent_span_id, "");
        assert!(span.is_root());
    }

    #[test]
    fn test_numeric_status_becomes_string() {
        let source = json!({"statusCode": 2});
        let span = Span::from_source(&source);
        assert_eq!(span.status, "2");
    }

    #[test]
    fn test_malformed_fields_degrade_to_zero_values() {
        let source = json!({
            "traceId": 42,
            "startTime": "not-a-timestamp",
            "durationNano": {"nested": true}
        });
        let span = Span::from_source(&source);
        assert_eq!(span.trace_id, "");
        assert_eq!(span.start_time, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(span.duration_nanos, 0);
        assert!(span.attributes.is_empty());
    }

    #[test]
    fn test_epoch_nano_timestamps_accepted() {
        let source = json!({"startTime": 1_709_294_400_000_000_042i64});
        let span = Span::from_source(&source);
        assert_eq!(span.start_time.timestamp_subsec_nanos(), 42);
    }

    #[test]
    fn test_flat_service_fallback() {
        let source = json!({"serviceName": "billing"});
        let span = Span::from_source(&source);
        assert_eq!(span.service, "billing");
    }

    #[test]
    fn test_duration_from_string() {
        let source = json!({"durationNano": "12345"});
        let span = Span::from_source(&source);
        assert_eq!(span.duration_nanos, 12345);
    }

    #[test]
    fn test_overview_from_root() {
        let source = json!({
            "traceId": "t1",
            "spanId": "root-span",
            "name": "root-op",
            "startTime": "2024-03-01T12:00:00Z",
            "endTime": "2024-03-01T12:00:01Z",
            "durationNano": 1_000_000_000i64
        });
        let root = Span::from_source(&source);
        let overview = TraceOverview::from_root(&root, 3);

        assert_eq!(overview.trace_id, "t1");
        assert_eq!(overview.root_span_id, "root-span");
        assert_eq!(overview.root_span_name, "root-op");
        assert_eq!(overview.span_count, 3);
        assert_eq!(overview.start_time, "2024-03-01T12:00:00.000000000Z");
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("sideways"), None);
        assert_eq!(SortOrder::parse(""), None);
    }
}
