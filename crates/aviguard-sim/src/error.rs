//! Error types for the stateful side of the controller.

use thiserror::Error;

/// Failure while handing a record to a telemetry sink.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to write telemetry record")]
    Io(#[from] std::io::Error),

    #[error("failed to encode telemetry record")]
    Encode(#[from] serde_json::Error),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
