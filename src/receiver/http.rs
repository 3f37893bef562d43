use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use opentelemetry_proto::tonic::collector::{
    logs::v1::ExportLogsServiceResponse, metrics::v1::ExportMetricsServiceResponse,
    trace::v1::ExportTraceServiceResponse,
};
use prost::Message;
use tracing::{error, info, instrument, warn};

use crate::error::{ConsumerError, UnmarshalError};
use crate::model::Unmarshal;
use crate::model::otlp::{
    Encoding, JsonEncoder, ProtobufEncoder, logs_unmarshaler, metrics_unmarshaler,
    traces_unmarshaler,
};
use crate::pdata::{Logs, Metrics, SignalKind, Traces};
use crate::port::TelemetryConsumer;

/// Headroom above the encoder limit so slightly oversized bodies still reach
/// the encoder and are answered with 400.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

type SharedUnmarshaler<D> = Arc<dyn Unmarshal<Data = D> + Send + Sync>;

/// One unmarshaler per supported encoding for a single signal kind.
pub struct Unmarshalers<D> {
    protobuf: SharedUnmarshaler<D>,
    json: SharedUnmarshaler<D>,
}

impl<D> Unmarshalers<D> {
    pub fn new(protobuf: SharedUnmarshaler<D>, json: SharedUnmarshaler<D>) -> Self {
        Self { protobuf, json }
    }

    fn for_encoding(&self, encoding: Encoding) -> &(dyn Unmarshal<Data = D> + Send + Sync) {
        match encoding {
            Encoding::Protobuf => self.protobuf.as_ref(),
            Encoding::Json => self.json.as_ref(),
        }
    }
}

impl<D> Clone for Unmarshalers<D> {
    fn clone(&self) -> Self {
        Self {
            protobuf: Arc::clone(&self.protobuf),
            json: Arc::clone(&self.json),
        }
    }
}

/// Application state for OTLP handlers
#[derive(Clone)]
pub struct ReceiverState {
    pub traces: Unmarshalers<Traces>,
    pub metrics: Unmarshalers<Metrics>,
    pub logs: Unmarshalers<Logs>,
    pub consumer: Arc<dyn TelemetryConsumer>,
    /// Largest request body the encoders accept
    pub max_payload_bytes: usize,
}

impl ReceiverState {
    /// Wire the OTLP protobuf and JSON unmarshalers in front of `consumer`.
    pub fn otlp(max_payload_bytes: usize, consumer: Arc<dyn TelemetryConsumer>) -> Self {
        let protobuf = ProtobufEncoder::new(max_payload_bytes);
        let json = JsonEncoder::new(max_payload_bytes);

        Self {
            traces: Unmarshalers::new(
                Arc::new(traces_unmarshaler(protobuf)),
                Arc::new(traces_unmarshaler(json)),
            ),
            metrics: Unmarshalers::new(
                Arc::new(metrics_unmarshaler(protobuf)),
                Arc::new(metrics_unmarshaler(json)),
            ),
            logs: Unmarshalers::new(
                Arc::new(logs_unmarshaler(protobuf)),
                Arc::new(logs_unmarshaler(json)),
            ),
            consumer,
            max_payload_bytes,
        }
    }

    /// Transport-level body cap; replaces axum's 2 MiB default.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        self.max_payload_bytes.saturating_add(BODY_LIMIT_SLACK)
    }
}

/// Create Axum router for OTLP HTTP endpoints
pub fn otlp_routes(state: ReceiverState) -> Router {
    let body_limit = state.body_limit();
    Router::new()
        .route("/v1/traces", post(receive_traces_http))
        .route("/v1/metrics", post(receive_metrics_http))
        .route("/v1/logs", post(receive_logs_http))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn request_encoding(headers: &HeaderMap) -> Encoding {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    Encoding::from_content_type(content_type)
}

fn empty_response(status: StatusCode, encoding: Encoding) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, encoding.content_type())],
        Bytes::new(),
    )
        .into_response()
}

/// Success response carrying an empty `Export*ServiceResponse`.
fn export_response<M: Message>(encoding: Encoding, response: &M) -> Response {
    let body = match encoding {
        Encoding::Protobuf => Bytes::from(response.encode_to_vec()),
        Encoding::Json => Bytes::from_static(b"{}"),
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoding.content_type())],
        body,
    )
        .into_response()
}

fn reject(signal: SignalKind, encoding: Encoding, err: &UnmarshalError) -> Response {
    warn!(%signal, error = %err, "Rejected OTLP request");
    empty_response(StatusCode::BAD_REQUEST, encoding)
}

fn consumer_failed(signal: SignalKind, encoding: Encoding, err: &ConsumerError) -> Response {
    error!(%signal, error = %err, "Failed to consume OTLP data");
    empty_response(StatusCode::INTERNAL_SERVER_ERROR, encoding)
}

/// OTLP HTTP traces receiver
#[instrument(skip(state, headers, body), fields(body_size = body.len()))]
async fn receive_traces_http(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let encoding = request_encoding(&headers);
    let traces = match state.traces.for_encoding(encoding).unmarshal(&body) {
        Ok(traces) => traces,
        Err(e) => return reject(SignalKind::Traces, encoding, &e),
    };

    let count = traces.span_count();
    if let Err(e) = state.consumer.consume_traces(traces).await {
        return consumer_failed(SignalKind::Traces, encoding, &e);
    }

    info!(count, "Received OTLP traces");
    export_response(encoding, &ExportTraceServiceResponse::default())
}

/// OTLP HTTP metrics receiver
#[instrument(skip(state, headers, body), fields(body_size = body.len()))]
async fn receive_metrics_http(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let encoding = request_encoding(&headers);
    let metrics = match state.metrics.for_encoding(encoding).unmarshal(&body) {
        Ok(metrics) => metrics,
        Err(e) => return reject(SignalKind::Metrics, encoding, &e),
    };

    let count = metrics.point_count();
    if let Err(e) = state.consumer.consume_metrics(metrics).await {
        return consumer_failed(SignalKind::Metrics, encoding, &e);
    }

    info!(count, "Received OTLP metrics");
    export_response(encoding, &ExportMetricsServiceResponse::default())
}

/// OTLP HTTP logs receiver
#[instrument(skip(state, headers, body), fields(body_size = body.len()))]
async fn receive_logs_http(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let encoding = request_encoding(&headers);
    let logs = match state.logs.for_encoding(encoding).unmarshal(&body) {
        Ok(logs) => logs,
        Err(e) => return reject(SignalKind::Logs, encoding, &e),
    };

    let count = logs.record_count();
    if let Err(e) = state.consumer.consume_logs(logs).await {
        return consumer_failed(SignalKind::Logs, encoding, &e);
    }

    info!(count, "Received OTLP logs");
    export_response(encoding, &ExportLogsServiceResponse::default())
}
