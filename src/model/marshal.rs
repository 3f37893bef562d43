//! pdata -> model -> bytes pipelines, the mirror image of `unmarshal`.

use tracing::debug;

use super::{
    FromLogsTranslator, FromMetricsTranslator, FromTracesTranslator, LogsEncoder, MetricsEncoder,
    TracesEncoder,
};
use crate::error::{BoxError, MarshalError};
use crate::pdata::{Logs, Metrics, SignalKind, Traces};

pub trait Marshal {
    type Data;

    fn marshal(&self, data: &Self::Data) -> Result<Vec<u8>, MarshalError>;
}

fn marshal_with<D, M>(
    signal: SignalKind,
    data: &D,
    translate: impl FnOnce(&D) -> Result<M, BoxError>,
    encode: impl FnOnce(M) -> Result<Vec<u8>, BoxError>,
) -> Result<Vec<u8>, MarshalError> {
    let model = translate(data).map_err(|e| {
        debug!(%signal, stage = "translate", error = %e, "marshal stage failed");
        MarshalError::Translate(e)
    })?;

    encode(model).map_err(|e| {
        debug!(%signal, stage = "encode", error = %e, "marshal stage failed");
        MarshalError::Encode(e)
    })
}

#[derive(Debug, Clone)]
pub struct TracesMarshaler<T, E> {
    translator: T,
    encoder: E,
}

impl<T, E> TracesMarshaler<T, E>
where
    T: FromTracesTranslator,
    E: TracesEncoder<Model = T::Model>,
{
    pub fn new(translator: T, encoder: E) -> Self {
        Self {
            translator,
            encoder,
        }
    }
}

impl<T, E> Marshal for TracesMarshaler<T, E>
where
    T: FromTracesTranslator,
    E: TracesEncoder<Model = T::Model>,
{
    type Data = Traces;

    fn marshal(&self, data: &Traces) -> Result<Vec<u8>, MarshalError> {
        marshal_with(
            SignalKind::Traces,
            data,
            |td| self.translator.from_traces(td),
            |m| self.encoder.encode_traces(m),
        )
    }
}

#[derive(Debug, Clone)]
pub struct MetricsMarshaler<T, E> {
    translator: T,
    encoder: E,
}

impl<T, E> MetricsMarshaler<T, E>
where
    T: FromMetricsTranslator,
    E: MetricsEncoder<Model = T::Model>,
{
    pub fn new(translator: T, encoder: E) -> Self {
        Self {
            translator,
            encoder,
        }
    }
}

impl<T, E> Marshal for MetricsMarshaler<T, E>
where
    T: FromMetricsTranslator,
    E: MetricsEncoder<Model = T::Model>,
{
    type Data = Metrics;

    fn marshal(&self, data: &Metrics) -> Result<Vec<u8>, MarshalError> {
        marshal_with(
            SignalKind::Metrics,
            data,
            |md| self.translator.from_metrics(md),
            |m| self.encoder.encode_metrics(m),
        )
    }
}

#[derive(Debug, Clone)]
pub struct LogsMarshaler<T, E> {
    translator: T,
    encoder: E,
}

impl<T, E> LogsMarshaler<T, E>
where
    T: FromLogsTranslator,
    E: LogsEncoder<Model = T::Model>,
{
    pub fn new(translator: T, encoder: E) -> Self {
        Self {
            translator,
            encoder,
        }
    }
}

impl<T, E> Marshal for LogsMarshaler<T, E>
where
    T: FromLogsTranslator,
    E: LogsEncoder<Model = T::Model>,
{
    type Data = Logs;

    fn marshal(&self, data: &Logs) -> Result<Vec<u8>, MarshalError> {
        marshal_with(
            SignalKind::Logs,
            data,
            |ld| self.translator.from_logs(ld),
            |m| self.encoder.encode_logs(m),
        )
    }
}
