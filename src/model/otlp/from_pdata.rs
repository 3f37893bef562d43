//! pdata to OTLP request messages.
//!
//! Consecutive records sharing resource and scope identity are regrouped
//! into one resource/scope block; attribute values are emitted as strings.

use opentelemetry_proto::tonic::{
    collector::{
        logs::v1::ExportLogsServiceRequest, metrics::v1::ExportMetricsServiceRequest,
        trace::v1::ExportTraceServiceRequest,
    },
    logs::v1::{LogRecord as ProtoLogRecord, ResourceLogs, ScopeLogs},
    metrics::v1::{
        Gauge, Histogram, HistogramDataPoint, Metric, NumberDataPoint, ResourceMetrics,
        ScopeMetrics, Sum, Summary, SummaryDataPoint, metric::Data, number_data_point,
        summary_data_point::ValueAtQuantile,
    },
    trace::v1::{
        ResourceSpans, ScopeSpans, Span as ProtoSpan, Status,
        span::{Event, Link},
    },
};

use super::OtlpTranslator;
use super::convert::{
    OriginRef, SPAN_ID_LEN, TRACE_ID_LEN, decode_id, decode_required_id, string_value,
    to_key_values,
};
use crate::error::{BoxError, TranslateError};
use crate::model::{FromLogsTranslator, FromMetricsTranslator, FromTracesTranslator};
use crate::pdata::{
    LogRecord, Logs, MetricPoint, MetricValue, Metrics, NumberValue, Span, StatusCode, Traces,
};

impl FromTracesTranslator for OtlpTranslator {
    type Model = ExportTraceServiceRequest;

    fn from_traces(&self, traces: &Traces) -> Result<ExportTraceServiceRequest, BoxError> {
        Ok(traces_to_request(traces)?)
    }
}

impl FromMetricsTranslator for OtlpTranslator {
    type Model = ExportMetricsServiceRequest;

    fn from_metrics(&self, metrics: &Metrics) -> Result<ExportMetricsServiceRequest, BoxError> {
        Ok(metrics_to_request(metrics))
    }
}

impl FromLogsTranslator for OtlpTranslator {
    type Model = ExportLogsServiceRequest;

    fn from_logs(&self, logs: &Logs) -> Result<ExportLogsServiceRequest, BoxError> {
        Ok(logs_to_request(logs)?)
    }
}

fn span_origin(span: &Span) -> OriginRef<'_> {
    OriginRef {
        resource_schema_url: &span.resource_schema_url,
        resource_attributes: &span.resource_attributes,
        scope_schema_url: &span.scope_schema_url,
        scope_name: &span.scope_name,
        scope_version: &span.scope_version,
        scope_attributes: &span.scope_attributes,
    }
}

fn log_origin(record: &LogRecord) -> OriginRef<'_> {
    OriginRef {
        resource_schema_url: &record.resource_schema_url,
        resource_attributes: &record.resource_attributes,
        scope_schema_url: &record.scope_schema_url,
        scope_name: &record.scope_name,
        scope_version: &record.scope_version,
        scope_attributes: &record.scope_attributes,
    }
}

fn point_origin(point: &MetricPoint) -> OriginRef<'_> {
    OriginRef {
        resource_schema_url: &point.resource_schema_url,
        resource_attributes: &point.resource_attributes,
        scope_schema_url: &point.scope_schema_url,
        scope_name: &point.scope_name,
        scope_version: &point.scope_version,
        scope_attributes: &point.scope_attributes,
    }
}

/// Convert pdata traces back to an OTLP trace request
pub fn traces_to_request(traces: &Traces) -> Result<ExportTraceServiceRequest, TranslateError> {
    let mut resource_spans: Vec<ResourceSpans> = Vec::new();
    let mut last: Option<OriginRef<'_>> = None;

    for span in &traces.spans {
        let origin = span_origin(span);
        let proto = span_to_proto(span)?;

        match (last, resource_spans.last_mut()) {
            (Some(prev), Some(rs)) if prev == origin => {
                if let Some(ss) = rs.scope_spans.last_mut() {
                    ss.spans.push(proto);
                }
            }
            (Some(prev), Some(rs)) if prev.same_resource(&origin) => {
                rs.scope_spans.push(ScopeSpans {
                    scope: origin.scope(),
                    spans: vec![proto],
                    schema_url: origin.scope_schema_url.to_string(),
                });
            }
            _ => resource_spans.push(ResourceSpans {
                resource: origin.resource(),
                scope_spans: vec![ScopeSpans {
                    scope: origin.scope(),
                    spans: vec![proto],
                    schema_url: origin.scope_schema_url.to_string(),
                }],
                schema_url: origin.resource_schema_url.to_string(),
            }),
        }
        last = Some(origin);
    }

    Ok(ExportTraceServiceRequest { resource_spans })
}

fn span_to_proto(span: &Span) -> Result<ProtoSpan, TranslateError> {
    let links = span
        .links
        .iter()
        .map(|link| {
            Ok(Link {
                trace_id: decode_required_id(&link.trace_id, "link.trace_id", TRACE_ID_LEN)?,
                span_id: decode_required_id(&link.span_id, "link.span_id", SPAN_ID_LEN)?,
                trace_state: link.trace_state.clone(),
                attributes: to_key_values(&link.attributes),
                ..Default::default()
            })
        })
        .collect::<Result<Vec<_>, TranslateError>>()?;

    let status = if span.status_code == StatusCode::Unset && span.status_message.is_empty() {
        None
    } else {
        Some(Status {
            code: span.status_code.into(),
            message: span.status_message.clone(),
        })
    };

    Ok(ProtoSpan {
        trace_id: decode_required_id(&span.trace_id, "trace_id", TRACE_ID_LEN)?,
        span_id: decode_required_id(&span.span_id, "span_id", SPAN_ID_LEN)?,
        parent_span_id: decode_id(&span.parent_span_id, "parent_span_id", SPAN_ID_LEN)?,
        trace_state: span.trace_state.clone(),
        flags: span.flags,
        name: span.span_name.clone(),
        kind: span.span_kind.into(),
        start_time_unix_nano: span.timestamp,
        end_time_unix_nano: span.timestamp.saturating_add(span.duration),
        attributes: to_key_values(&span.span_attributes),
        events: span
            .events
            .iter()
            .map(|event| Event {
                time_unix_nano: event.timestamp,
                name: event.name.clone(),
                attributes: to_key_values(&event.attributes),
                ..Default::default()
            })
            .collect(),
        links,
        status,
        ..Default::default()
    })
}

/// Convert pdata logs back to an OTLP logs request
pub fn logs_to_request(logs: &Logs) -> Result<ExportLogsServiceRequest, TranslateError> {
    let mut resource_logs: Vec<ResourceLogs> = Vec::new();
    let mut last: Option<OriginRef<'_>> = None;

    for record in &logs.records {
        let origin = log_origin(record);
        let proto = log_to_proto(record)?;

        match (last, resource_logs.last_mut()) {
            (Some(prev), Some(rl)) if prev == origin => {
                if let Some(sl) = rl.scope_logs.last_mut() {
                    sl.log_records.push(proto);
                }
            }
            (Some(prev), Some(rl)) if prev.same_resource(&origin) => {
                rl.scope_logs.push(ScopeLogs {
                    scope: origin.scope(),
                    log_records: vec![proto],
                    schema_url: origin.scope_schema_url.to_string(),
                });
            }
            _ => resource_logs.push(ResourceLogs {
                resource: origin.resource(),
                scope_logs: vec![ScopeLogs {
                    scope: origin.scope(),
                    log_records: vec![proto],
                    schema_url: origin.scope_schema_url.to_string(),
                }],
                schema_url: origin.resource_schema_url.to_string(),
            }),
        }
        last = Some(origin);
    }

    Ok(ExportLogsServiceRequest { resource_logs })
}

fn log_to_proto(record: &LogRecord) -> Result<ProtoLogRecord, TranslateError> {
    Ok(ProtoLogRecord {
        time_unix_nano: record.timestamp,
        observed_time_unix_nano: record.observed_timestamp,
        severity_number: i32::from(record.severity_number),
        severity_text: record.severity_text.clone(),
        body: (!record.body.is_empty()).then(|| string_value(&record.body)),
        attributes: to_key_values(&record.log_attributes),
        flags: u32::from(record.trace_flags),
        trace_id: decode_id(&record.trace_id, "trace_id", TRACE_ID_LEN)?,
        span_id: decode_id(&record.span_id, "span_id", SPAN_ID_LEN)?,
        event_name: record.event_name.clone(),
        ..Default::default()
    })
}

/// Convert pdata metrics back to an OTLP metrics request
pub fn metrics_to_request(metrics: &Metrics) -> ExportMetricsServiceRequest {
    let mut resource_metrics: Vec<ResourceMetrics> = Vec::new();
    let mut last: Option<OriginRef<'_>> = None;

    for point in &metrics.points {
        let origin = point_origin(point);
        let metric = point_to_metric(point);

        match (last, resource_metrics.last_mut()) {
            (Some(prev), Some(rm)) if prev == origin => {
                if let Some(sm) = rm.scope_metrics.last_mut() {
                    push_metric(&mut sm.metrics, metric);
                }
            }
            (Some(prev), Some(rm)) if prev.same_resource(&origin) => {
                rm.scope_metrics.push(ScopeMetrics {
                    scope: origin.scope(),
                    metrics: vec![metric],
                    schema_url: origin.scope_schema_url.to_string(),
                });
            }
            _ => resource_metrics.push(ResourceMetrics {
                resource: origin.resource(),
                scope_metrics: vec![ScopeMetrics {
                    scope: origin.scope(),
                    metrics: vec![metric],
                    schema_url: origin.scope_schema_url.to_string(),
                }],
                schema_url: origin.resource_schema_url.to_string(),
            }),
        }
        last = Some(origin);
    }

    ExportMetricsServiceRequest { resource_metrics }
}

/// Append `metric` to the scope, folding its data points into the previous
/// metric when both describe the same stream.
fn push_metric(metrics: &mut Vec<Metric>, mut metric: Metric) {
    if let Some(prev) = metrics.last_mut() {
        if merge_data_points(prev, &mut metric) {
            return;
        }
    }
    metrics.push(metric);
}

fn merge_data_points(target: &mut Metric, next: &mut Metric) -> bool {
    if target.name != next.name
        || target.description != next.description
        || target.unit != next.unit
    {
        return false;
    }

    match (target.data.as_mut(), next.data.as_mut()) {
        (Some(Data::Gauge(a)), Some(Data::Gauge(b))) => {
            a.data_points.append(&mut b.data_points);
            true
        }
        (Some(Data::Sum(a)), Some(Data::Sum(b)))
            if a.is_monotonic == b.is_monotonic
                && a.aggregation_temporality == b.aggregation_temporality =>
        {
            a.data_points.append(&mut b.data_points);
            true
        }
        (Some(Data::Histogram(a)), Some(Data::Histogram(b)))
            if a.aggregation_temporality == b.aggregation_temporality =>
        {
            a.data_points.append(&mut b.data_points);
            true
        }
        (Some(Data::Summary(a)), Some(Data::Summary(b))) => {
            a.data_points.append(&mut b.data_points);
            true
        }
        _ => false,
    }
}

fn point_to_metric(point: &MetricPoint) -> Metric {
    let attributes = to_key_values(&point.attributes);

    let data = match &point.value {
        MetricValue::Gauge { value } => Data::Gauge(Gauge {
            data_points: vec![number_point(point, attributes, *value)],
        }),
        MetricValue::Sum {
            value,
            is_monotonic,
            temporality,
        } => Data::Sum(Sum {
            data_points: vec![number_point(point, attributes, *value)],
            aggregation_temporality: (*temporality).into(),
            is_monotonic: *is_monotonic,
        }),
        MetricValue::Histogram {
            count,
            sum,
            min,
            max,
            bucket_counts,
            explicit_bounds,
            temporality,
        } => Data::Histogram(Histogram {
            data_points: vec![HistogramDataPoint {
                attributes,
                start_time_unix_nano: point.start_timestamp,
                time_unix_nano: point.timestamp,
                count: *count,
                sum: *sum,
                min: *min,
                max: *max,
                bucket_counts: bucket_counts.clone(),
                explicit_bounds: explicit_bounds.clone(),
                flags: point.flags,
                ..Default::default()
            }],
            aggregation_temporality: (*temporality).into(),
        }),
        MetricValue::Summary {
            count,
            sum,
            quantiles,
        } => Data::Summary(Summary {
            data_points: vec![SummaryDataPoint {
                attributes,
                start_time_unix_nano: point.start_timestamp,
                time_unix_nano: point.timestamp,
                count: *count,
                sum: *sum,
                quantile_values: quantiles
                    .iter()
                    .map(|q| ValueAtQuantile {
                        quantile: q.quantile,
                        value: q.value,
                    })
                    .collect(),
                flags: point.flags,
                ..Default::default()
            }],
        }),
    };

    Metric {
        name: point.metric_name.clone(),
        description: point.metric_description.clone(),
        unit: point.metric_unit.clone(),
        data: Some(data),
        ..Default::default()
    }
}

fn number_point(
    point: &MetricPoint,
    attributes: Vec<opentelemetry_proto::tonic::common::v1::KeyValue>,
    value: NumberValue,
) -> NumberDataPoint {
    let value = match value {
        NumberValue::Int(i) => number_data_point::Value::AsInt(i),
        NumberValue::Double(d) => number_data_point::Value::AsDouble(d),
    };

    NumberDataPoint {
        attributes,
        start_time_unix_nano: point.start_timestamp,
        time_unix_nano: point.timestamp,
        flags: point.flags,
        value: Some(value),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdata::{AggregationTemporality, Attributes, SpanLink};

    fn span(name: &str, scope: &str) -> Span {
        let mut resource_attributes = Attributes::new();
        resource_attributes.insert("service.name".to_string(), "alt-backend".to_string());
        Span {
            trace_id: "0102030405060708090a0b0c0d0e0f10".to_string(),
            span_id: "0102030405060708".to_string(),
            span_name: name.to_string(),
            scope_name: scope.to_string(),
            service_name: "alt-backend".to_string(),
            resource_attributes,
            timestamp: 100,
            duration: 50,
            ..Default::default()
        }
    }

    fn gauge_point(name: &str, value: i64) -> MetricPoint {
        MetricPoint {
            timestamp: 10,
            start_timestamp: 0,
            metric_name: name.to_string(),
            metric_description: String::new(),
            metric_unit: "1".to_string(),
            service_name: "unknown".to_string(),
            resource_schema_url: String::new(),
            resource_attributes: Attributes::new(),
            scope_schema_url: String::new(),
            scope_name: String::new(),
            scope_version: String::new(),
            scope_attributes: Attributes::new(),
            attributes: Attributes::new(),
            flags: 0,
            value: MetricValue::Gauge {
                value: NumberValue::Int(value),
            },
        }
    }

    #[test]
    fn test_traces_to_request_groups_by_scope() {
        let traces = Traces::new(vec![
            span("a", "scope-1"),
            span("b", "scope-1"),
            span("c", "scope-2"),
        ]);

        let request = traces_to_request(&traces).unwrap();

        assert_eq!(request.resource_spans.len(), 1);
        let scopes = &request.resource_spans[0].scope_spans;
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[0].spans.len(), 2);
        assert_eq!(scopes[1].spans.len(), 1);
        assert_eq!(scopes[1].scope.as_ref().unwrap().name, "scope-2");
    }

    #[test]
    fn test_span_to_proto_restores_end_time_and_ids() {
        let proto = span_to_proto(&span("a", "s")).unwrap();

        assert_eq!(proto.trace_id.len(), 16);
        assert_eq!(proto.span_id, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(proto.parent_span_id.is_empty());
        assert_eq!(proto.end_time_unix_nano, 150);
        assert!(proto.status.is_none());
    }

    #[test]
    fn test_span_to_proto_rejects_bad_hex() {
        let mut bad = span("a", "s");
        bad.trace_id = "not-hex".to_string();

        let err = traces_to_request(&Traces::new(vec![bad])).unwrap_err();
        assert!(err.to_string().starts_with("invalid hex in trace_id"));
    }

    #[test]
    fn test_span_without_ids_is_rejected() {
        let traces = Traces::new(vec![Span {
            span_name: "x".to_string(),
            ..Default::default()
        }]);

        let err = traces_to_request(&traces).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid trace_id length: expected 16 bytes, got 0"
        );

        let mut missing_span_id = span("a", "s");
        missing_span_id.span_id.clear();
        let err = span_to_proto(&missing_span_id).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::InvalidIdLength {
                field: "span_id",
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_link_without_ids_is_rejected() {
        let mut linked = span("a", "s");
        linked.links.push(SpanLink::default());

        let err = span_to_proto(&linked).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid link.trace_id length: expected 16 bytes, got 0"
        );
    }

    #[test]
    fn test_log_to_proto_omits_empty_body() {
        let proto = log_to_proto(&LogRecord::default()).unwrap();
        assert!(proto.body.is_none());
        assert!(proto.trace_id.is_empty());
    }

    #[test]
    fn test_metrics_to_request_merges_same_stream() {
        let metrics = Metrics::new(vec![
            gauge_point("queue.depth", 1),
            gauge_point("queue.depth", 2),
            gauge_point("queue.lag", 3),
        ]);

        let request = metrics_to_request(&metrics);

        let scope = &request.resource_metrics[0].scope_metrics[0];
        assert_eq!(scope.metrics.len(), 2);
        match &scope.metrics[0].data {
            Some(Data::Gauge(g)) => assert_eq!(g.data_points.len(), 2),
            other => panic!("expected gauge, got {other:?}"),
        }
    }

    #[test]
    fn test_sum_with_different_temporality_is_not_merged() {
        let mut delta = gauge_point("requests", 1);
        delta.value = MetricValue::Sum {
            value: NumberValue::Int(1),
            is_monotonic: true,
            temporality: AggregationTemporality::Delta,
        };
        let mut cumulative = delta.clone();
        cumulative.value = MetricValue::Sum {
            value: NumberValue::Int(5),
            is_monotonic: true,
            temporality: AggregationTemporality::Cumulative,
        };

        let request = metrics_to_request(&Metrics::new(vec![delta, cumulative]));

        assert_eq!(request.resource_metrics[0].scope_metrics[0].metrics.len(), 2);
    }
}
