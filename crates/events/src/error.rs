//! Error types for the pluvio-events crate.

use pluvio_series::SeriesError;

/// Error type for all fallible operations in the pluvio-events crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// Wraps an invalid input series.
    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),

    /// Returned when a separating gap is shorter than one sampling step.
    #[error("gap of {gap} s is shorter than the {step} s sampling step")]
    GapTooShort {
        /// Requested gap in seconds.
        gap: i64,
        /// Sampling step in seconds.
        step: i64,
    },

    /// Returned when the wet threshold is negative or non-finite.
    #[error("invalid wet threshold: {value} (must be finite and >= 0)")]
    InvalidThreshold {
        /// The offending threshold.
        value: f64,
    },

    /// Returned when a summary is requested over zero events.
    #[error("no rain events to summarise")]
    NoEvents,
}
