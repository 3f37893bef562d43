//! OTLP request messages to pdata.
//!
//! Resource and scope nesting is flattened: every output record carries the
//! identity of the blocks it came from.

use opentelemetry_proto::tonic::{
    collector::{
        logs::v1::ExportLogsServiceRequest, metrics::v1::ExportMetricsServiceRequest,
        trace::v1::ExportTraceServiceRequest,
    },
    logs::v1::LogRecord as ProtoLogRecord,
    metrics::v1::{Metric, NumberDataPoint, metric::Data, number_data_point},
    trace::v1::Span as ProtoSpan,
};

use super::OtlpTranslator;
use super::convert::{
    Origin, SPAN_ID_LEN, TRACE_ID_LEN, convert_attributes, encode_id, encode_optional_id,
    extract_body,
};
use crate::error::{BoxError, TranslateError};
use crate::model::{ToLogsTranslator, ToMetricsTranslator, ToTracesTranslator};
use crate::pdata::{
    Attributes, LogRecord, Logs, MetricPoint, MetricValue, Metrics, NumberValue, QuantileValue,
    Span, SpanEvent, SpanKind, SpanLink, StatusCode, Traces,
};

impl ToTracesTranslator for OtlpTranslator {
    type Model = ExportTraceServiceRequest;

    fn to_traces(&self, model: ExportTraceServiceRequest) -> Result<Traces, BoxError> {
        Ok(convert_spans(&model)?)
    }
}

impl ToMetricsTranslator for OtlpTranslator {
    type Model = ExportMetricsServiceRequest;

    fn to_metrics(&self, model: ExportMetricsServiceRequest) -> Result<Metrics, BoxError> {
        Ok(convert_metrics(&model)?)
    }
}

impl ToLogsTranslator for OtlpTranslator {
    type Model = ExportLogsServiceRequest;

    fn to_logs(&self, model: ExportLogsServiceRequest) -> Result<Logs, BoxError> {
        Ok(convert_log_records(&model)?)
    }
}

/// Convert OTLP trace request to pdata traces
pub fn convert_spans(request: &ExportTraceServiceRequest) -> Result<Traces, TranslateError> {
    let mut spans = Vec::new();

    for resource_spans in &request.resource_spans {
        let resource = Origin::resource(
            resource_spans.resource.as_ref(),
            &resource_spans.schema_url,
        );

        for scope_spans in &resource_spans.scope_spans {
            let origin = resource.with_scope(scope_spans.scope.as_ref(), &scope_spans.schema_url);

            for span in &scope_spans.spans {
                spans.push(convert_single_span(span, &origin)?);
            }
        }
    }

    Ok(Traces::new(spans))
}

fn convert_single_span(span: &ProtoSpan, origin: &Origin) -> Result<Span, TranslateError> {
    let events = span
        .events
        .iter()
        .map(|event| SpanEvent {
            timestamp: event.time_unix_nano,
            name: event.name.clone(),
            attributes: convert_attributes(&event.attributes),
        })
        .collect();

    let links = span
        .links
        .iter()
        .map(|link| {
            Ok(SpanLink {
                trace_id: encode_id(&link.trace_id, "link.trace_id", TRACE_ID_LEN)?,
                span_id: encode_id(&link.span_id, "link.span_id", SPAN_ID_LEN)?,
                trace_state: link.trace_state.clone(),
                attributes: convert_attributes(&link.attributes),
            })
        })
        .collect::<Result<Vec<_>, TranslateError>>()?;

    Ok(Span {
        timestamp: span.start_time_unix_nano,
        duration: span
            .end_time_unix_nano
            .saturating_sub(span.start_time_unix_nano),
        trace_id: encode_id(&span.trace_id, "trace_id", TRACE_ID_LEN)?,
        span_id: encode_id(&span.span_id, "span_id", SPAN_ID_LEN)?,
        parent_span_id: encode_optional_id(&span.parent_span_id, "parent_span_id", SPAN_ID_LEN)?,
        trace_state: span.trace_state.clone(),
        flags: span.flags,
        span_name: span.name.clone(),
        span_kind: SpanKind::from(span.kind),
        service_name: origin.service_name.clone(),
        resource_schema_url: origin.resource_schema_url.clone(),
        resource_attributes: origin.resource_attributes.clone(),
        scope_schema_url: origin.scope_schema_url.clone(),
        scope_name: origin.scope_name.clone(),
        scope_version: origin.scope_version.clone(),
        scope_attributes: origin.scope_attributes.clone(),
        span_attributes: convert_attributes(&span.attributes),
        status_code: span
            .status
            .as_ref()
            .map(|s| StatusCode::from(s.code))
            .unwrap_or(StatusCode::Unset),
        status_message: span
            .status
            .as_ref()
            .map(|s| s.message.clone())
            .unwrap_or_default(),
        events,
        links,
    })
}

/// Convert OTLP log request to pdata logs
pub fn convert_log_records(request: &ExportLogsServiceRequest) -> Result<Logs, TranslateError> {
    let mut records = Vec::new();

    for resource_logs in &request.resource_logs {
        let resource = Origin::resource(resource_logs.resource.as_ref(), &resource_logs.schema_url);

        for scope_logs in &resource_logs.scope_logs {
            let origin = resource.with_scope(scope_logs.scope.as_ref(), &scope_logs.schema_url);

            for log_record in &scope_logs.log_records {
                records.push(convert_single_log(log_record, &origin)?);
            }
        }
    }

    Ok(Logs::new(records))
}

fn convert_single_log(
    record: &ProtoLogRecord,
    origin: &Origin,
) -> Result<LogRecord, TranslateError> {
    Ok(LogRecord {
        timestamp: record.time_unix_nano,
        observed_timestamp: record.observed_time_unix_nano,
        trace_id: encode_optional_id(&record.trace_id, "trace_id", TRACE_ID_LEN)?,
        span_id: encode_optional_id(&record.span_id, "span_id", SPAN_ID_LEN)?,
        trace_flags: narrow_u8(i64::from(record.flags), "flags")?,
        severity_text: record.severity_text.clone(),
        severity_number: narrow_u8(i64::from(record.severity_number), "severity_number")?,
        body: extract_body(record.body.as_ref()),
        event_name: record.event_name.clone(),
        resource_schema_url: origin.resource_schema_url.clone(),
        resource_attributes: origin.resource_attributes.clone(),
        scope_schema_url: origin.scope_schema_url.clone(),
        scope_name: origin.scope_name.clone(),
        scope_version: origin.scope_version.clone(),
        scope_attributes: origin.scope_attributes.clone(),
        log_attributes: convert_attributes(&record.attributes),
        service_name: origin.service_name.clone(),
    })
}

fn narrow_u8(value: i64, field: &'static str) -> Result<u8, TranslateError> {
    u8::try_from(value).map_err(|_| TranslateError::ValueOutOfRange {
        field,
        value,
        target: "u8",
    })
}

/// Convert OTLP metrics request to pdata metrics, one point per data point
pub fn convert_metrics(request: &ExportMetricsServiceRequest) -> Result<Metrics, TranslateError> {
    let mut points = Vec::new();

    for resource_metrics in &request.resource_metrics {
        let resource = Origin::resource(
            resource_metrics.resource.as_ref(),
            &resource_metrics.schema_url,
        );

        for scope_metrics in &resource_metrics.scope_metrics {
            let origin =
                resource.with_scope(scope_metrics.scope.as_ref(), &scope_metrics.schema_url);

            for metric in &scope_metrics.metrics {
                convert_single_metric(metric, &origin, &mut points)?;
            }
        }
    }

    Ok(Metrics::new(points))
}

/// Timestamps, attributes and flags of one data point.
struct PointHeader {
    timestamp: u64,
    start_timestamp: u64,
    attributes: Attributes,
    flags: u32,
}

fn convert_single_metric(
    metric: &Metric,
    origin: &Origin,
    points: &mut Vec<MetricPoint>,
) -> Result<(), TranslateError> {
    let mut push = |header: PointHeader, value: MetricValue| {
        points.push(MetricPoint {
            timestamp: header.timestamp,
            start_timestamp: header.start_timestamp,
            metric_name: metric.name.clone(),
            metric_description: metric.description.clone(),
            metric_unit: metric.unit.clone(),
            service_name: origin.service_name.clone(),
            resource_schema_url: origin.resource_schema_url.clone(),
            resource_attributes: origin.resource_attributes.clone(),
            scope_schema_url: origin.scope_schema_url.clone(),
            scope_name: origin.scope_name.clone(),
            scope_version: origin.scope_version.clone(),
            scope_attributes: origin.scope_attributes.clone(),
            attributes: header.attributes,
            flags: header.flags,
            value,
        });
    };

    match &metric.data {
        Some(Data::Gauge(gauge)) => {
            for dp in &gauge.data_points {
                let value = number_value(dp, &metric.name)?;
                push(number_header(dp), MetricValue::Gauge { value });
            }
        }
        Some(Data::Sum(sum)) => {
            for dp in &sum.data_points {
                let value = MetricValue::Sum {
                    value: number_value(dp, &metric.name)?,
                    is_monotonic: sum.is_monotonic,
                    temporality: sum.aggregation_temporality.into(),
                };
                push(number_header(dp), value);
            }
        }
        Some(Data::Histogram(histogram)) => {
            for dp in &histogram.data_points {
                let header = PointHeader {
                    timestamp: dp.time_unix_nano,
                    start_timestamp: dp.start_time_unix_nano,
                    attributes: convert_attributes(&dp.attributes),
                    flags: dp.flags,
                };
                let value = MetricValue::Histogram {
                    count: dp.count,
                    sum: dp.sum,
                    min: dp.min,
                    max: dp.max,
                    bucket_counts: dp.bucket_counts.clone(),
                    explicit_bounds: dp.explicit_bounds.clone(),
                    temporality: histogram.aggregation_temporality.into(),
                };
                push(header, value);
            }
        }
        Some(Data::Summary(summary)) => {
            for dp in &summary.data_points {
                let header = PointHeader {
                    timestamp: dp.time_unix_nano,
                    start_timestamp: dp.start_time_unix_nano,
                    attributes: convert_attributes(&dp.attributes),
                    flags: dp.flags,
                };
                let value = MetricValue::Summary {
                    count: dp.count,
                    sum: dp.sum,
                    quantiles: dp
                        .quantile_values
                        .iter()
                        .map(|q| QuantileValue {
                            quantile: q.quantile,
                            value: q.value,
                        })
                        .collect(),
                };
                push(header, value);
            }
        }
        Some(Data::ExponentialHistogram(_)) => {
            return Err(TranslateError::UnsupportedMetricType {
                name: metric.name.clone(),
                kind: "exponential_histogram",
            });
        }
        None => return Err(TranslateError::MissingMetricData(metric.name.clone())),
    }

    Ok(())
}

fn number_header(dp: &NumberDataPoint) -> PointHeader {
    PointHeader {
        timestamp: dp.time_unix_nano,
        start_timestamp: dp.start_time_unix_nano,
        attributes: convert_attributes(&dp.attributes),
        flags: dp.flags,
    }
}

fn number_value(dp: &NumberDataPoint, metric_name: &str) -> Result<NumberValue, TranslateError> {
    match dp.value {
        Some(number_data_point::Value::AsInt(i)) => Ok(NumberValue::Int(i)),
        Some(number_data_point::Value::AsDouble(d)) => Ok(NumberValue::Double(d)),
        None => Err(TranslateError::MissingMetricData(metric_name.to_string())),
    }
}
