//! Error types for the pluvio-disagg crate.

use pluvio_model::ModelError;
use pluvio_series::SeriesError;

/// Error type for all fallible operations in the pluvio-disagg crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DisaggError {
    /// Returned when an observed coarse value is negative or non-finite.
    #[error("invalid observed value {value} (must be finite and >= 0)")]
    InvalidObserved {
        /// The offending value.
        value: f64,
    },

    /// Returned when the disaggregation configuration is invalid.
    #[error("invalid disaggregation config: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when no simulated storm with positive depth was found.
    #[error(
        "disaggregation failed for interval {interval} (observed {observed}): \
         no storm with positive depth after {retries} attempts"
    )]
    Failure {
        /// Index of the coarse interval.
        interval: usize,
        /// Observed coarse depth.
        observed: f64,
        /// Number of storms drawn.
        retries: usize,
    },

    /// Wraps a step or duration mismatch.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Wraps a storm simulation failure.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
