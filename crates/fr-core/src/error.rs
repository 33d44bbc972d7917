//! Error types for the telemetry engine.

use fr_data::DataError;
use thiserror::Error;

/// Errors produced while interpreting a telemetry table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TelemetryError {
    /// No column could be classified as the time axis
    #[error("No time column found")]
    MissingTimeColumn,

    /// No column could be classified as altitude; phases are skipped
    #[error("No altitude column found")]
    MissingAltitudeColumn,

    /// A series is unusable (non-monotonic time, mismatched lengths, too short)
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    /// The table has no rows; scrubbing is disabled
    #[error("Table has no rows")]
    EmptyTable,

    /// Engine configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TelemetryError {
    /// Creates an invalid-series error.
    pub fn invalid_series(msg: impl Into<String>) -> Self {
        Self::InvalidSeries(msg.into())
    }

    /// Creates an invalid-config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<DataError> for TelemetryError {
    fn from(error: DataError) -> Self {
        Self::InvalidSeries(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
