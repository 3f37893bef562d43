//! Two-stage conversion between wire bytes and pdata
//!
//! An encoder turns bytes into an encoding-specific model value; a translator
//! turns that model value into pdata. Unmarshalers run the two stages in that
//! order, marshalers run the mirror image. Encoder and translator are paired
//! through the associated `Model` type, so a translator can only be plugged
//! behind an encoder that produces exactly the model it expects.

pub mod marshal;
pub mod otlp;
pub mod unmarshal;

use crate::error::BoxError;
use crate::pdata::{Logs, Metrics, Traces};

pub use marshal::{LogsMarshaler, Marshal, MetricsMarshaler, TracesMarshaler};
pub use unmarshal::{LogsUnmarshaler, MetricsUnmarshaler, TracesUnmarshaler, Unmarshal};

pub trait TracesDecoder {
    type Model;

    fn decode_traces(&self, buf: &[u8]) -> Result<Self::Model, BoxError>;
}

pub trait MetricsDecoder {
    type Model;

    fn decode_metrics(&self, buf: &[u8]) -> Result<Self::Model, BoxError>;
}

pub trait LogsDecoder {
    type Model;

    fn decode_logs(&self, buf: &[u8]) -> Result<Self::Model, BoxError>;
}

pub trait TracesEncoder {
    type Model;

    fn encode_traces(&self, model: Self::Model) -> Result<Vec<u8>, BoxError>;
}

pub trait MetricsEncoder {
    type Model;

    fn encode_metrics(&self, model: Self::Model) -> Result<Vec<u8>, BoxError>;
}

pub trait LogsEncoder {
    type Model;

    fn encode_logs(&self, model: Self::Model) -> Result<Vec<u8>, BoxError>;
}

pub trait ToTracesTranslator {
    type Model;

    fn to_traces(&self, model: Self::Model) -> Result<Traces, BoxError>;
}

pub trait ToMetricsTranslator {
    type Model;

    fn to_metrics(&self, model: Self::Model) -> Result<Metrics, BoxError>;
}

pub trait ToLogsTranslator {
    type Model;

    fn to_logs(&self, model: Self::Model) -> Result<Logs, BoxError>;
}

pub trait FromTracesTranslator {
    type Model;

    fn from_traces(&self, traces: &Traces) -> Result<Self::Model, BoxError>;
}

pub trait FromMetricsTranslator {
    type Model;

    fn from_metrics(&self, metrics: &Metrics) -> Result<Self::Model, BoxError>;
}

pub trait FromLogsTranslator {
    type Model;

    fn from_logs(&self, logs: &Logs) -> Result<Self::Model, BoxError>;
}

/// Shared references forward to the referenced collaborator, so one encoder
/// or translator can back several pipelines.
macro_rules! forward_ref_impls {
    ($($trait:ident :: $method:ident ($in:ty) -> $out:ty;)*) => {
        $(
            impl<T: $trait + ?Sized> $trait for &T {
                type Model = T::Model;

                fn $method(&self, input: $in) -> Result<$out, BoxError> {
                    (**self).$method(input)
                }
            }
        )*
    };
}

forward_ref_impls! {
    TracesDecoder::decode_traces(&[u8]) -> T::Model;
    MetricsDecoder::decode_metrics(&[u8]) -> T::Model;
    LogsDecoder::decode_logs(&[u8]) -> T::Model;
    TracesEncoder::encode_traces(T::Model) -> Vec<u8>;
    MetricsEncoder::encode_metrics(T::Model) -> Vec<u8>;
    LogsEncoder::encode_logs(T::Model) -> Vec<u8>;
    ToTracesTranslator::to_traces(T::Model) -> Traces;
    ToMetricsTranslator::to_metrics(T::Model) -> Metrics;
    ToLogsTranslator::to_logs(T::Model) -> Logs;
    FromTracesTranslator::from_traces(&Traces) -> T::Model;
    FromMetricsTranslator::from_metrics(&Metrics) -> T::Model;
    FromLogsTranslator::from_logs(&Logs) -> T::Model;
}
