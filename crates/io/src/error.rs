//! Error types for pluvio-io.

use std::path::PathBuf;

use pluvio_model::ModelError;
use pluvio_series::SeriesError;

/// Error type for all fallible operations in the pluvio-io crate.
///
/// Covers filesystem failures, Parquet format errors, schema validation,
/// and invalid content surfaced by the series and model crates.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when a file cannot be created, read, or written.
    #[error("i/o error on {}: {reason}", path.display())]
    File {
        /// Path of the file being accessed.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a timestamp cannot be represented.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time conversion issue.
        reason: String,
    },

    /// Returned when a parameter file has neither a `.toml` nor a `.json` extension.
    #[error("unsupported parameter file extension: {}", path.display())]
    UnsupportedFormat {
        /// Path with the unrecognised extension.
        path: PathBuf,
    },

    /// Wraps a series that failed validation after reading.
    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),

    /// Wraps an invalid or malformed parameter document.
    #[error("invalid parameters: {0}")]
    Model(#[from] ModelError),
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}
