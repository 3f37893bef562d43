//! OTLP wire encoders: binary protobuf and OTLP/JSON.
//!
//! Both share the request message types from `opentelemetry-proto`, so either
//! can be paired with `OtlpTranslator`.

use opentelemetry_proto::tonic::collector::{
    logs::v1::ExportLogsServiceRequest, metrics::v1::ExportMetricsServiceRequest,
    trace::v1::ExportTraceServiceRequest,
};
use prost::Message;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BoxError, CodecError};
use crate::model::{
    LogsDecoder, LogsEncoder, MetricsDecoder, MetricsEncoder, TracesDecoder, TracesEncoder,
};

/// Default upper bound for a single payload (4 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 4 * 1024 * 1024;

fn check_size(buf: &[u8], max: usize) -> Result<(), CodecError> {
    if buf.len() > max {
        return Err(CodecError::PayloadTooLarge {
            size: buf.len(),
            max,
        });
    }
    Ok(())
}

fn decode_protobuf<M: Message + Default>(buf: &[u8], max: usize) -> Result<M, BoxError> {
    check_size(buf, max)?;
    let model = M::decode(buf).map_err(CodecError::from)?;
    Ok(model)
}

fn decode_json<M: DeserializeOwned>(buf: &[u8], max: usize) -> Result<M, BoxError> {
    check_size(buf, max)?;
    let model: M = serde_json::from_slice(buf).map_err(CodecError::from)?;
    Ok(model)
}

fn encode_json<M: Serialize>(model: &M) -> Result<Vec<u8>, BoxError> {
    let buf = serde_json::to_vec(model).map_err(CodecError::from)?;
    Ok(buf)
}

/// Binary protobuf encoding (`application/x-protobuf`).
#[derive(Debug, Clone, Copy)]
pub struct ProtobufEncoder {
    max_payload_bytes: usize,
}

impl ProtobufEncoder {
    #[must_use]
    pub fn new(max_payload_bytes: usize) -> Self {
        Self { max_payload_bytes }
    }
}

impl Default for ProtobufEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_BYTES)
    }
}

impl TracesDecoder for ProtobufEncoder {
    type Model = ExportTraceServiceRequest;

    fn decode_traces(&self, buf: &[u8]) -> Result<ExportTraceServiceRequest, BoxError> {
        decode_protobuf(buf, self.max_payload_bytes)
    }
}

impl MetricsDecoder for ProtobufEncoder {
    type Model = ExportMetricsServiceRequest;

    fn decode_metrics(&self, buf: &[u8]) -> Result<ExportMetricsServiceRequest, BoxError> {
        decode_protobuf(buf, self.max_payload_bytes)
    }
}

impl LogsDecoder for ProtobufEncoder {
    type Model = ExportLogsServiceRequest;

    fn decode_logs(&self, buf: &[u8]) -> Result<ExportLogsServiceRequest, BoxError> {
        decode_protobuf(buf, self.max_payload_bytes)
    }
}

impl TracesEncoder for ProtobufEncoder {
    type Model = ExportTraceServiceRequest;

    fn encode_traces(&self, model: ExportTraceServiceRequest) -> Result<Vec<u8>, BoxError> {
        Ok(model.encode_to_vec())
    }
}

impl MetricsEncoder for ProtobufEncoder {
    type Model = ExportMetricsServiceRequest;

    fn encode_metrics(&self, model: ExportMetricsServiceRequest) -> Result<Vec<u8>, BoxError> {
        Ok(model.encode_to_vec())
    }
}

impl LogsEncoder for ProtobufEncoder {
    type Model = ExportLogsServiceRequest;

    fn encode_logs(&self, model: ExportLogsServiceRequest) -> Result<Vec<u8>, BoxError> {
        Ok(model.encode_to_vec())
    }
}

/// OTLP/JSON encoding (`application/json`).
#[derive(Debug, Clone, Copy)]
pub struct JsonEncoder {
    max_payload_bytes: usize,
}

impl JsonEncoder {
    #[must_use]
    pub fn new(max_payload_bytes: usize) -> Self {
        Self { max_payload_bytes }
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_BYTES)
    }
}

impl TracesDecoder for JsonEncoder {
    type Model = ExportTraceServiceRequest;

    fn decode_traces(&self, buf: &[u8]) -> Result<ExportTraceServiceRequest, BoxError> {
        decode_json(buf, self.max_payload_bytes)
    }
}

impl MetricsDecoder for JsonEncoder {
    type Model = ExportMetricsServiceRequest;

    fn decode_metrics(&self, buf: &[u8]) -> Result<ExportMetricsServiceRequest, BoxError> {
        decode_json(buf, self.max_payload_bytes)
    }
}

impl LogsDecoder for JsonEncoder {
    type Model = ExportLogsServiceRequest;

    fn decode_logs(&self, buf: &[u8]) -> Result<ExportLogsServiceRequest, BoxError> {
        decode_json(buf, self.max_payload_bytes)
    }
}

impl TracesEncoder for JsonEncoder {
    type Model = ExportTraceServiceRequest;

    fn encode_traces(&self, model: ExportTraceServiceRequest) -> Result<Vec<u8>, BoxError> {
        encode_json(&model)
    }
}

impl MetricsEncoder for JsonEncoder {
    type Model = ExportMetricsServiceRequest;

    fn encode_metrics(&self, model: ExportMetricsServiceRequest) -> Result<Vec<u8>, BoxError> {
        encode_json(&model)
    }
}

impl LogsEncoder for JsonEncoder {
    type Model = ExportLogsServiceRequest;

    fn encode_logs(&self, model: ExportLogsServiceRequest) -> Result<Vec<u8>, BoxError> {
        encode_json(&model)
    }
}
