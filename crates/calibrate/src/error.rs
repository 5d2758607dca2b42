//! Error types for the pluvio-calibrate crate.

use pluvio_events::EventError;
use pluvio_model::{ModelError, Parameters};
use pluvio_moments::MomentError;

/// Error type for all fallible operations in the pluvio-calibrate crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    /// Returned when the calibration configuration is invalid.
    #[error("invalid calibration config: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when too few scales carry usable statistics.
    #[error("ill-conditioned calibration: {valid_scales} informative scale(s), need at least 2")]
    IllConditioned {
        /// Number of scales with positive mean and variance.
        valid_scales: usize,
    },

    /// Returned when the optimizer fails to reduce the objective or leaves
    /// the valid parameter domain.
    #[error("calibration diverged; last parameters: {last}")]
    Divergence {
        /// Best parameters reached before giving up.
        last: Parameters,
    },

    /// Wraps a moment estimation failure.
    #[error("moment estimation failed: {0}")]
    Moments(#[from] MomentError),

    /// Wraps an event extraction failure.
    #[error("event extraction failed: {0}")]
    Events(#[from] EventError),

    /// Wraps an invalid parameter set.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
