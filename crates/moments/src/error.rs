//! Error types for the pluvio-moments crate.

use pluvio_series::SeriesError;

/// Error type for all fallible operations in the pluvio-moments crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MomentError {
    /// Wraps an invalid series or a scale that is not a multiple of the step.
    #[error("invalid series or scale: {0}")]
    Series(#[from] SeriesError),

    /// Returned when the scale list is empty.
    #[error("at least one aggregation scale is required")]
    NoScales,

    /// Returned when scales are not strictly increasing.
    #[error("scales must be strictly increasing (scale {index} is {scale} s after {previous} s)")]
    UnorderedScales {
        /// Position of the offending scale.
        index: usize,
        /// The offending scale in seconds.
        scale: i64,
        /// The preceding scale in seconds.
        previous: i64,
    },

    /// Returned when a scale yields fewer than two aggregated values.
    #[error("insufficient data at scale {scale} s: {n} aggregated values (need at least 2)")]
    InsufficientData {
        /// Scale in seconds.
        scale: i64,
        /// Number of complete blocks available.
        n: usize,
    },
}
