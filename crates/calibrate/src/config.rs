//! Configuration for parameter calibration.

use chrono::TimeDelta;
use pluvio_events::EventConfig;
use pluvio_model::Parameters;

use crate::error::CalibrationError;

/// Relative weights of each statistic in the objective.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentWeights {
    pub mean: f64,
    pub variance: f64,
    pub lag1_autocovariance: f64,
    pub dry_probability: f64,
}

impl MomentWeights {
    /// Weights every statistic equally.
    pub fn uniform() -> Self {
        Self {
            mean: 1.0,
            variance: 1.0,
            lag1_autocovariance: 1.0,
            dry_probability: 1.0,
        }
    }

    fn as_array(&self) -> [f64; 4] {
        [
            self.mean,
            self.variance,
            self.lag1_autocovariance,
            self.dry_probability,
        ]
    }
}

impl Default for MomentWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Configuration for Bartlett-Lewis calibration.
///
/// The optimizer settings apply to [`crate::calibrate`]; the scale list,
/// event settings and intra-event gap are used only by
/// [`crate::calibrate_series`], which estimates moments itself.
///
/// # Example
///
/// ```
/// use pluvio_calibrate::CalibrationConfig;
///
/// let config = CalibrationConfig::new()
///     .with_max_iters(500)
///     .with_max_restarts(3)
///     .with_tolerance(1e-5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct CalibrationConfig {
    max_iters: u64,
    max_restarts: usize,
    tolerance: f64,
    weights: MomentWeights,
    initial: Option<Parameters>,
    scales: Vec<TimeDelta>,
    intra_event_gap: TimeDelta,
    events: EventConfig,
}

impl CalibrationConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `max_iters = 2000`, `max_restarts = 8`, `tolerance = 1e-6`,
    /// uniform weights, no explicit initial guess, scales of 1, 3, 6 and 24
    /// hours, a 15-minute intra-event gap and default event settings.
    pub fn new() -> Self {
        Self {
            max_iters: 2000,
            max_restarts: 8,
            tolerance: 1e-6,
            weights: MomentWeights::uniform(),
            initial: None,
            scales: vec![
                TimeDelta::hours(1),
                TimeDelta::hours(3),
                TimeDelta::hours(6),
                TimeDelta::hours(24),
            ],
            intra_event_gap: TimeDelta::minutes(15),
            events: EventConfig::new(),
        }
    }

    /// Sets the iteration cap of each Nelder-Mead run.
    pub fn with_max_iters(mut self, n: u64) -> Self {
        self.max_iters = n;
        self
    }

    /// Sets how many times the solver may restart from its best point.
    pub fn with_max_restarts(mut self, n: usize) -> Self {
        self.max_restarts = n;
        self
    }

    /// Sets the relative objective reduction below which restarts stop.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Sets the statistic weights.
    pub fn with_weights(mut self, weights: MomentWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets an explicit initial guess.
    pub fn with_initial(mut self, params: Parameters) -> Self {
        self.initial = Some(params);
        self
    }

    /// Sets the aggregation scales used by [`crate::calibrate_series`].
    pub fn with_scales(mut self, scales: Vec<TimeDelta>) -> Self {
        self.scales = scales;
        self
    }

    /// Sets the dry run that splits an event into pulses.
    pub fn with_intra_event_gap(mut self, gap: TimeDelta) -> Self {
        self.intra_event_gap = gap;
        self
    }

    /// Sets the event extraction settings.
    pub fn with_events(mut self, events: EventConfig) -> Self {
        self.events = events;
        self
    }

    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    pub fn max_restarts(&self) -> usize {
        self.max_restarts
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn weights(&self) -> &MomentWeights {
        &self.weights
    }

    pub fn initial(&self) -> Option<&Parameters> {
        self.initial.as_ref()
    }

    pub fn scales(&self) -> &[TimeDelta] {
        &self.scales
    }

    pub fn intra_event_gap(&self) -> TimeDelta {
        self.intra_event_gap
    }

    pub fn events(&self) -> &EventConfig {
        &self.events
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.max_iters == 0 {
            return Err(CalibrationError::InvalidConfig {
                reason: "max_iters must be > 0".into(),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(CalibrationError::InvalidConfig {
                reason: format!("tolerance must be finite and > 0, got {}", self.tolerance),
            });
        }
        let weights = self.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CalibrationError::InvalidConfig {
                reason: "weights must be finite and >= 0".into(),
            });
        }
        if weights.iter().all(|&w| w == 0.0) {
            return Err(CalibrationError::InvalidConfig {
                reason: "at least one weight must be positive".into(),
            });
        }
        if self.intra_event_gap <= TimeDelta::zero() {
            return Err(CalibrationError::InvalidConfig {
                reason: "intra_event_gap must be positive".into(),
            });
        }
        self.events.validate()?;
        Ok(())
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::new()
    }
}
