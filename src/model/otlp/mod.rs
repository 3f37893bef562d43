//! OTLP collaborators for the model pipelines
//!
//! This module provides:
//! - `ProtobufEncoder` / `JsonEncoder`: OTLP wire encodings over the
//!   `opentelemetry-proto` request messages
//! - `OtlpTranslator`: OTLP request messages to and from pdata

mod convert;
pub mod encoding;
pub mod from_pdata;
pub mod to_pdata;

use crate::model::{
    LogsDecoder, LogsEncoder, LogsMarshaler, LogsUnmarshaler, MetricsDecoder, MetricsEncoder,
    MetricsMarshaler, MetricsUnmarshaler, TracesDecoder, TracesEncoder, TracesMarshaler,
    TracesUnmarshaler,
};
use opentelemetry_proto::tonic::collector::{
    logs::v1::ExportLogsServiceRequest, metrics::v1::ExportMetricsServiceRequest,
    trace::v1::ExportTraceServiceRequest,
};

pub use encoding::{DEFAULT_MAX_PAYLOAD_BYTES, JsonEncoder, ProtobufEncoder};

/// Stateless translator between OTLP request messages and pdata.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtlpTranslator;

/// Supported OTLP/HTTP payload encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Protobuf,
    Json,
}

impl Encoding {
    pub const PROTOBUF_CONTENT_TYPE: &'static str = "application/x-protobuf";
    pub const JSON_CONTENT_TYPE: &'static str = "application/json";

    /// Pick the encoding for a request `Content-Type`; protobuf is the default.
    #[must_use]
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.trim().starts_with(Self::JSON_CONTENT_TYPE) => Encoding::Json,
            _ => Encoding::Protobuf,
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Encoding::Protobuf => Self::PROTOBUF_CONTENT_TYPE,
            Encoding::Json => Self::JSON_CONTENT_TYPE,
        }
    }
}

pub fn traces_unmarshaler<E>(encoder: E) -> TracesUnmarshaler<E, OtlpTranslator>
where
    E: TracesDecoder<Model = ExportTraceServiceRequest>,
{
    TracesUnmarshaler::new(encoder, OtlpTranslator)
}

pub fn metrics_unmarshaler<E>(encoder: E) -> MetricsUnmarshaler<E, OtlpTranslator>
where
    E: MetricsDecoder<Model = ExportMetricsServiceRequest>,
{
    MetricsUnmarshaler::new(encoder, OtlpTranslator)
}

pub fn logs_unmarshaler<E>(encoder: E) -> LogsUnmarshaler<E, OtlpTranslator>
where
    E: LogsDecoder<Model = ExportLogsServiceRequest>,
{
    LogsUnmarshaler::new(encoder, OtlpTranslator)
}

pub fn traces_marshaler<E>(encoder: E) -> TracesMarshaler<OtlpTranslator, E>
where
    E: TracesEncoder<Model = ExportTraceServiceRequest>,
{
    TracesMarshaler::new(OtlpTranslator, encoder)
}

pub fn metrics_marshaler<E>(encoder: E) -> MetricsMarshaler<OtlpTranslator, E>
where
    E: MetricsEncoder<Model = ExportMetricsServiceRequest>,
{
    MetricsMarshaler::new(OtlpTranslator, encoder)
}

pub fn logs_marshaler<E>(encoder: E) -> LogsMarshaler<OtlpTranslator, E>
where
    E: LogsEncoder<Model = ExportLogsServiceRequest>,
{
    LogsMarshaler::new(OtlpTranslator, encoder)
}
