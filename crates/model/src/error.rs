//! Error types for the pluvio-model crate.

use pluvio_series::SeriesError;

/// Error type for all fallible operations in the pluvio-model crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Returned when a parameter is non-finite or not strictly positive.
    #[error("invalid parameter {name}: {value} (must be finite and > 0)")]
    InvalidParameter {
        /// Parameter key.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Returned when a duration or step is not strictly positive.
    #[error("invalid duration: {reason}")]
    InvalidDuration {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a parameter document cannot be parsed or written.
    #[error("{format} parameter document: {reason}")]
    Document {
        /// Document format (`"TOML"` or `"JSON"`).
        format: &'static str,
        /// Underlying parser message.
        reason: String,
    },

    /// Wraps an error building the output series.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}
