//! OTLP HTTP receiver
//!
//! Supports:
//! - POST /v1/traces
//! - POST /v1/metrics
//! - POST /v1/logs
//!
//! Each endpoint accepts `application/x-protobuf` and `application/json`.

pub mod http;

pub use http::{ReceiverState, otlp_routes};
