//! Error types for decoding and fetching NWIS data.

/// Error types for the NWIS library
use thiserror::Error;

/// Main error type for NWIS operations
#[derive(Error, Debug)]
pub enum NwisError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Failed to parse a time-series JSON document
    #[error("Failed to parse time-series document: {0}")]
    DocumentParse(#[from] serde_json::Error),

    /// Failed to parse RDB data
    #[error("Failed to parse RDB: {0}")]
    RdbParse(#[from] csv::Error),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(#[from] wdv_utils::error::DateError),
}

/// Type alias for Results using NwisError
pub type Result<T> = std::result::Result<T, NwisError>;
