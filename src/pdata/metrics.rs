//! Metric signal. One `MetricPoint` per OTLP data point, with the owning
//! metric's identity copied onto each point.

use serde::{Deserialize, Serialize};

use super::Attributes;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub points: Vec<MetricPoint>,
}

impl Metrics {
    #[must_use]
    pub fn new(points: Vec<MetricPoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Point timestamp (nanoseconds since Unix epoch)
    pub timestamp: u64,

    /// Start of the aggregation window (0 when unknown)
    pub start_timestamp: u64,

    pub metric_name: String,
    pub metric_description: String,
    pub metric_unit: String,

    pub service_name: String,
    pub resource_schema_url: String,
    pub resource_attributes: Attributes,

    pub scope_schema_url: String,
    pub scope_name: String,
    pub scope_version: String,
    pub scope_attributes: Attributes,

    /// Data point attributes
    pub attributes: Attributes,

    pub flags: u32,
    pub value: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricValue {
    Gauge {
        value: NumberValue,
    },
    Sum {
        value: NumberValue,
        is_monotonic: bool,
        temporality: AggregationTemporality,
    },
    Histogram {
        count: u64,
        sum: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
        bucket_counts: Vec<u64>,
        explicit_bounds: Vec<f64>,
        temporality: AggregationTemporality,
    },
    Summary {
        count: u64,
        sum: f64,
        quantiles: Vec<QuantileValue>,
    },
}

impl MetricValue {
    /// Short name of the metric type, as used in logs and errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            MetricValue::Gauge { .. } => "gauge",
            MetricValue::Sum { .. } => "sum",
            MetricValue::Histogram { .. } => "histogram",
            MetricValue::Summary { .. } => "summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NumberValue {
    Int(i64),
    Double(f64),
}

impl NumberValue {
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            NumberValue::Int(i) => i as f64,
            NumberValue::Double(d) => d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileValue {
    pub quantile: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[repr(i8)]
pub enum AggregationTemporality {
    #[default]
    Unspecified = 0,
    Delta = 1,
    Cumulative = 2,
}

impl From<i32> for AggregationTemporality {
    fn from(value: i32) -> Self {
        match value {
            1 => AggregationTemporality::Delta,
            2 => AggregationTemporality::Cumulative,
            _ => AggregationTemporality::Unspecified,
        }
    }
}

impl From<AggregationTemporality> for i32 {
    fn from(temporality: AggregationTemporality) -> Self {
        temporality as i32
    }
}
