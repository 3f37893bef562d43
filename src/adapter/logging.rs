use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::error::ConsumerError;
use crate::pdata::{Logs, Metrics, Traces};
use crate::port::TelemetryConsumer;

/// Consumer that only records what it received.
///
/// Used by the binary when no storage backend is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConsumer;

impl TelemetryConsumer for LoggingConsumer {
    fn consume_traces(
        &self,
        traces: Traces,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>> {
        Box::pin(async move {
            let services = distinct(traces.spans.iter().map(|s| s.service_name.as_str()));
            info!(spans = traces.span_count(), services, "Consumed traces");
            Ok(())
        })
    }

    fn consume_metrics(
        &self,
        metrics: Metrics,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>> {
        Box::pin(async move {
            let names = distinct(metrics.points.iter().map(|p| p.metric_name.as_str()));
            info!(
                points = metrics.point_count(),
                metrics = names,
                "Consumed metrics"
            );
            Ok(())
        })
    }

    fn consume_logs(
        &self,
        logs: Logs,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>> {
        Box::pin(async move {
            let services = distinct(logs.records.iter().map(|r| r.service_name.as_str()));
            info!(records = logs.record_count(), services, "Consumed logs");
            Ok(())
        })
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    let mut seen: Vec<&str> = values.collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}
