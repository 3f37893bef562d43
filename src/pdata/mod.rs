//! Canonical in-memory telemetry model
//!
//! Every pipeline in this crate ends (or starts) here. The `Default` value of
//! each signal container is its zero value: no records.

mod logs;
mod metrics;
mod traces;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use logs::{LogRecord, Logs};
pub use metrics::{
    AggregationTemporality, MetricPoint, MetricValue, Metrics, NumberValue, QuantileValue,
};
pub use traces::{Span, SpanEvent, SpanKind, SpanLink, StatusCode, Traces};

/// Attribute map with values flattened to strings.
pub type Attributes = HashMap<String, String>;

/// The three telemetry data categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Traces,
    Metrics,
    Logs,
}

impl SignalKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SignalKind::Traces => "traces",
            SignalKind::Metrics => "metrics",
            SignalKind::Logs => "logs",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kind_display() {
        assert_eq!(SignalKind::Traces.to_string(), "traces");
        assert_eq!(SignalKind::Metrics.to_string(), "metrics");
        assert_eq!(SignalKind::Logs.to_string(), "logs");
    }

    #[test]
    fn test_zero_values_are_empty() {
        assert!(Traces::default().is_empty());
        assert!(Metrics::default().is_empty());
        assert!(Logs::default().is_empty());
    }
}
