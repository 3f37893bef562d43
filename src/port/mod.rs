//! TelemetryConsumer trait: where unmarshaled pdata goes next.
//!
//! This trait enables dependency injection for testability,
//! allowing unit tests to use mock implementations.

use crate::error::ConsumerError;
use crate::pdata::{Logs, Metrics, Traces};
use std::future::Future;
use std::pin::Pin;

/// Downstream sink for canonical telemetry.
///
/// This trait is dyn-compatible by using boxed futures.
pub trait TelemetryConsumer: Send + Sync {
    fn consume_traces(
        &self,
        traces: Traces,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>>;

    fn consume_metrics(
        &self,
        metrics: Metrics,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>>;

    fn consume_logs(
        &self,
        logs: Logs,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>>;
}
