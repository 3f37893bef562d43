use thiserror::Error;

/// Opaque error returned by encoders and translators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of an unmarshal pipeline, tagged with the stage that failed.
#[derive(Error, Debug)]
pub enum UnmarshalError {
    #[error("unmarshal failed: {0}")]
    Decode(#[source] BoxError),

    #[error("converting model to pdata failed: {0}")]
    Translate(#[source] BoxError),
}

/// Failure of a marshal pipeline, tagged with the stage that failed.
#[derive(Error, Debug)]
pub enum MarshalError {
    #[error("converting pdata to model failed: {0}")]
    Translate(#[source] BoxError),

    #[error("marshal failed: {0}")]
    Encode(#[source] BoxError),
}

/// Errors raised by the OTLP wire encoders.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("payload of {size} bytes exceeds limit of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("invalid protobuf payload: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while mapping OTLP messages to and from pdata.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidIdLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid hex in {field}: {source}")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("{field} value {value} does not fit in {target}")]
    ValueOutOfRange {
        field: &'static str,
        value: i64,
        target: &'static str,
    },

    #[error("metric {0:?} has no data")]
    MissingMetricData(String),

    #[error("metric {name:?} has unsupported type {kind}")]
    UnsupportedMetricType { name: String, kind: &'static str },
}

#[derive(Error, Debug)]
pub enum ConsumerError {
    #[error("consumer rejected data: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}
