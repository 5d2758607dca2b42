//! Error types for the pluvio-series crate.

/// Error type for all fallible operations in the pluvio-series crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a series or record list is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the sampling step is zero or negative.
    #[error("sampling step must be positive, got {seconds} s")]
    NonPositiveStep {
        /// The offending step in seconds.
        seconds: i64,
    },

    /// Returned when a value is negative.
    #[error("negative value at index {index}: {value}")]
    NegativeValue {
        /// Position of the offending sample.
        index: usize,
        /// The negative value.
        value: f64,
    },

    /// Returned when a value is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the offending sample.
        index: usize,
    },

    /// Returned when consecutive timestamps are not exactly one step apart.
    #[error("non-uniform spacing at index {index}: expected {expected} s, got {got} s")]
    NonUniformSpacing {
        /// Position of the later record of the offending pair.
        index: usize,
        /// Expected spacing in seconds.
        expected: i64,
        /// Observed spacing in seconds.
        got: i64,
    },

    /// Returned when a span is not a positive whole number of steps.
    #[error("span of {span} s is not a positive multiple of the {step} s step")]
    NotAMultiple {
        /// Requested span in seconds.
        span: i64,
        /// Sampling step in seconds.
        step: i64,
    },
}
