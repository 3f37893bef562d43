//! Log signal, following the OTel Log Data Model.
//! See: https://opentelemetry.io/docs/specs/otel/logs/data-model/

use serde::{Deserialize, Serialize};

use super::Attributes;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Logs {
    pub records: Vec<LogRecord>,
}

impl Logs {
    #[must_use]
    pub fn new(records: Vec<LogRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A single log entry with its resource and scope identity inlined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp when the event occurred (nanoseconds since Unix epoch)
    pub timestamp: u64,

    /// Timestamp when the event was observed (nanoseconds since Unix epoch)
    pub observed_timestamp: u64,

    /// Trace ID (32-char hex string, empty when not correlated)
    pub trace_id: String,

    /// Span ID (16-char hex string, empty when not correlated)
    pub span_id: String,

    /// Trace flags (W3C Trace Context)
    pub trace_flags: u8,

    /// Severity text (e.g., "INFO", "ERROR")
    pub severity_text: String,

    /// Severity number (1-24, see OTel spec)
    pub severity_number: u8,

    pub body: String,
    pub event_name: String,

    pub resource_schema_url: String,
    pub resource_attributes: Attributes,

    pub scope_schema_url: String,
    pub scope_name: String,
    pub scope_version: String,
    pub scope_attributes: Attributes,

    pub log_attributes: Attributes,

    /// Service name (extracted from resource attributes for convenience)
    pub service_name: String,
}
