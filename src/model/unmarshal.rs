//! Bytes -> model -> pdata pipelines, one per signal kind.

use tracing::debug;

use super::{
    LogsDecoder, MetricsDecoder, ToLogsTranslator, ToMetricsTranslator, ToTracesTranslator,
    TracesDecoder,
};
use crate::error::{BoxError, UnmarshalError};
use crate::pdata::{Logs, Metrics, SignalKind, Traces};

/// Converts a raw payload into pdata.
///
/// Implementations hold no per-call state; calling `unmarshal` concurrently
/// on a shared instance is safe as long as the collaborators allow it.
pub trait Unmarshal {
    type Data;

    fn unmarshal(&self, buf: &[u8]) -> Result<Self::Data, UnmarshalError>;
}

/// Shared orchestration: decode, then translate, wrapping the first failure.
///
/// The decoded model is handed to `translate` untouched.
fn unmarshal_with<M, D>(
    signal: SignalKind,
    buf: &[u8],
    decode: impl FnOnce(&[u8]) -> Result<M, BoxError>,
    translate: impl FnOnce(M) -> Result<D, BoxError>,
) -> Result<D, UnmarshalError> {
    let model = decode(buf).map_err(|e| {
        debug!(%signal, stage = "decode", error = %e, "unmarshal stage failed");
        UnmarshalError::Decode(e)
    })?;

    translate(model).map_err(|e| {
        debug!(%signal, stage = "translate", error = %e, "unmarshal stage failed");
        UnmarshalError::Translate(e)
    })
}

#[derive(Debug, Clone)]
pub struct TracesUnmarshaler<E, T> {
    encoder: E,
    translator: T,
}

impl<E, T> TracesUnmarshaler<E, T>
where
    E: TracesDecoder,
    T: ToTracesTranslator<Model = E::Model>,
{
    pub fn new(encoder: E, translator: T) -> Self {
        Self {
            encoder,
            translator,
        }
    }
}

impl<E, T> Unmarshal for TracesUnmarshaler<E, T>
where
    E: TracesDecoder,
    T: ToTracesTranslator<Model = E::Model>,
{
    type Data = Traces;

    fn unmarshal(&self, buf: &[u8]) -> Result<Traces, UnmarshalError> {
        unmarshal_with(
            SignalKind::Traces,
            buf,
            |b| self.encoder.decode_traces(b),
            |m| self.translator.to_traces(m),
        )
    }
}

#[derive(Debug, Clone)]
pub struct MetricsUnmarshaler<E, T> {
    encoder: E,
    translator: T,
}

impl<E, T> MetricsUnmarshaler<E, T>
where
    E: MetricsDecoder,
    T: ToMetricsTranslator<Model = E::Model>,
{
    pub fn new(encoder: E, translator: T) -> Self {
        Self {
            encoder,
            translator,
        }
    }
}

impl<E, T> Unmarshal for MetricsUnmarshaler<E, T>
where
    E: MetricsDecoder,
    T: ToMetricsTranslator<Model = E::Model>,
{
    type Data = Metrics;

    fn unmarshal(&self, buf: &[u8]) -> Result<Metrics, UnmarshalError> {
        unmarshal_with(
            SignalKind::Metrics,
            buf,
            |b| self.encoder.decode_metrics(b),
            |m| self.translator.to_metrics(m),
        )
    }
}

#[derive(Debug, Clone)]
pub struct LogsUnmarshaler<E, T> {
    encoder: E,
    translator: T,
}

impl<E, T> LogsUnmarshaler<E, T>
where
    E: LogsDecoder,
    T: ToLogsTranslator<Model = E::Model>,
{
    pub fn new(encoder: E, translator: T) -> Self {
        Self {
            encoder,
            translator,
        }
    }
}

impl<E, T> Unmarshal for LogsUnmarshaler<E, T>
where
    E: LogsDecoder,
    T: ToLogsTranslator<Model = E::Model>,
{
    type Data = Logs;

    fn unmarshal(&self, buf: &[u8]) -> Result<Logs, UnmarshalError> {
        unmarshal_with(
            SignalKind::Logs,
            buf,
            |b| self.encoder.decode_logs(b),
            |m| self.translator.to_logs(m),
        )
    }
}
