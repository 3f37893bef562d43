use crate::adapter::LoggingConsumer;
use crate::config::Settings;
use crate::port::TelemetryConsumer;
use crate::receiver::ReceiverState;
use std::sync::Arc;

/// Shared application state holding the receiver pipelines.
pub struct AppState {
    pub receiver: ReceiverState,
}

impl AppState {
    /// Create `AppState` from configuration settings.
    ///
    /// The payload limit is applied to both the protobuf and JSON encoders.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let consumer: Arc<dyn TelemetryConsumer> = Arc::new(LoggingConsumer);
        Self {
            receiver: ReceiverState::otlp(settings.max_payload_bytes, consumer),
        }
    }
}
