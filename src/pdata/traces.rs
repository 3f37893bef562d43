//! Trace signal, following the OTel Trace Data Model.
//! See: https://opentelemetry.io/docs/specs/otel/trace/api/#span

use serde::{Deserialize, Serialize};

use super::Attributes;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traces {
    pub spans: Vec<Span>,
}

impl Traces {
    #[must_use]
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    #[must_use]
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// A single span with its resource and scope identity inlined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Start timestamp (nanoseconds since Unix epoch)
    pub timestamp: u64,

    /// Duration in nanoseconds
    pub duration: u64,

    /// Trace ID (32-char hex string)
    pub trace_id: String,

    /// Span ID (16-char hex string)
    pub span_id: String,

    /// Parent Span ID (empty for root spans)
    pub parent_span_id: String,

    /// W3C Trace State
    pub trace_state: String,

    /// W3C trace flags
    pub flags: u32,

    pub span_name: String,
    pub span_kind: SpanKind,

    /// Service name (extracted from resource attributes for convenience)
    pub service_name: String,

    pub resource_schema_url: String,
    pub resource_attributes: Attributes,

    pub scope_schema_url: String,
    pub scope_name: String,
    pub scope_version: String,
    pub scope_attributes: Attributes,

    pub span_attributes: Attributes,

    pub status_code: StatusCode,

    /// Status message (for error status)
    pub status_message: String,

    pub events: Vec<SpanEvent>,
    pub links: Vec<SpanLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanEvent {
    /// Event timestamp (nanoseconds since Unix epoch)
    pub timestamp: u64,
    pub name: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanLink {
    pub trace_id: String,
    pub span_id: String,
    pub trace_state: String,
    pub attributes: Attributes,
}

/// OpenTelemetry Span Kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[repr(i8)]
pub enum SpanKind {
    #[default]
    Unspecified = 0,
    Internal = 1,
    Server = 2,
    Client = 3,
    Producer = 4,
    Consumer = 5,
}

impl From<i32> for SpanKind {
    fn from(value: i32) -> Self {
        match value {
            1 => SpanKind::Internal,
            2 => SpanKind::Server,
            3 => SpanKind::Client,
            4 => SpanKind::Producer,
            5 => SpanKind::Consumer,
            _ => SpanKind::Unspecified,
        }
    }
}

impl From<SpanKind> for i32 {
    fn from(kind: SpanKind) -> Self {
        kind as i32
    }
}

/// OpenTelemetry Status Code
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[repr(i8)]
pub enum StatusCode {
    #[default]
    Unset = 0,
    Ok = 1,
    Error = 2,
}

impl From<i32> for StatusCode {
    fn from(value: i32) -> Self {
        match value {
            1 => StatusCode::Ok,
            2 => StatusCode::Error,
            _ => StatusCode::Unset,
        }
    }
}

impl From<StatusCode> for i32 {
    fn from(code: StatusCode) -> Self {
        code as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_kind_from_i32() {
        assert_eq!(SpanKind::from(0), SpanKind::Unspecified);
        assert_eq!(SpanKind::from(1), SpanKind::Internal);
        assert_eq!(SpanKind::from(2), SpanKind::Server);
        assert_eq!(SpanKind::from(3), SpanKind::Client);
        assert_eq!(SpanKind::from(4), SpanKind::Producer);
        assert_eq!(SpanKind::from(5), SpanKind::Consumer);
        assert_eq!(SpanKind::from(99), SpanKind::Unspecified);
    }

    #[test]
    fn test_span_kind_to_i32() {
        assert_eq!(i32::from(SpanKind::Server), 2);
        assert_eq!(i32::from(SpanKind::Unspecified), 0);
    }

    #[test]
    fn test_status_code_from_i32() {
        assert_eq!(StatusCode::from(0), StatusCode::Unset);
        assert_eq!(StatusCode::from(1), StatusCode::Ok);
        assert_eq!(StatusCode::from(2), StatusCode::Error);
        assert_eq!(StatusCode::from(99), StatusCode::Unset);
    }

    #[test]
    fn test_span_count() {
        let traces = Traces::new(vec![Span::default(), Span::default()]);
        assert_eq!(traces.span_count(), 2);
        assert!(!traces.is_empty());
    }
}
