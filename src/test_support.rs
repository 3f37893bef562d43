//! Shared test support utilities
//!
//! Provides a `MockConsumer` implementing `TelemetryConsumer` for use in unit tests.

use crate::error::ConsumerError;
use crate::pdata::{Logs, Metrics, Traces};
use crate::port::TelemetryConsumer;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock consumer that counts what it receives.
pub struct MockConsumer {
    calls: AtomicUsize,
    spans: AtomicUsize,
    points: AtomicUsize,
    records: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockConsumer {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            spans: AtomicUsize::new(0),
            points: AtomicUsize::new(0),
            records: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn spans_consumed(&self) -> usize {
        self.spans.load(Ordering::SeqCst)
    }

    pub fn points_consumed(&self) -> usize {
        self.points.load(Ordering::SeqCst)
    }

    pub fn records_consumed(&self) -> usize {
        self.records.load(Ordering::SeqCst)
    }

    fn record(&self, counter: &AtomicUsize, count: usize) -> Result<(), ConsumerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(ConsumerError::Rejected("Mock consume failure".to_string()));
        }
        counter.fetch_add(count, Ordering::SeqCst);
        Ok(())
    }
}

impl TelemetryConsumer for MockConsumer {
    fn consume_traces(
        &self,
        traces: Traces,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>> {
        let count = traces.span_count();
        Box::pin(async move { self.record(&self.spans, count) })
    }

    fn consume_metrics(
        &self,
        metrics: Metrics,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>> {
        let count = metrics.point_count();
        Box::pin(async move { self.record(&self.points, count) })
    }

    fn consume_logs(
        &self,
        logs: Logs,
    ) -> Pin<Box<dyn Future<Output = Result<(), ConsumerError>> + Send + '_>> {
        let count = logs.record_count();
        Box::pin(async move { self.record(&self.records, count) })
    }
}
