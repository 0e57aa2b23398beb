//! Error types for emission-trace

use chrono::NaiveDateTime;
use thiserror::Error;

/// Main error type for emission-trace operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error(
        "Unsupported lookback {lookback} secs for a period of {duration} secs starting at {period_start}"
    )]
    UnsupportedLookback {
        lookback: i64,
        duration: i64,
        period_start: NaiveDateTime,
    },

    #[error("Unresolved monitor id: {0}")]
    UnresolvedMonitor(i64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Prefix a malformed-record message with where it was read from
    pub fn at_line(self, source: &str, line: u64) -> Self {
        match self {
            Error::MalformedRecord(reason) => {
                Error::MalformedRecord(format!("{}:{}: {}", source, line, reason))
            }
            other => other,
        }
    }
}

/// Result type alias for emission-trace operations
pub type Result<T> = std::result::Result<T, Error>;
