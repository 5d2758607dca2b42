//! Configuration for event extraction.

use crate::error::EventError;

/// Configuration for rain event extraction.
///
/// # Example
///
/// ```
/// use pluvio_events::EventConfig;
///
/// let config = EventConfig::new()
///     .with_wet_threshold(0.1)
///     .with_assume_dry_before_start(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct EventConfig {
    wet_threshold: f64,
    assume_dry_before_start: bool,
}

impl EventConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `wet_threshold = 0.0` (any positive depth is wet),
    /// `assume_dry_before_start = false`.
    pub fn new() -> Self {
        Self {
            wet_threshold: 0.0,
            assume_dry_before_start: false,
        }
    }

    /// Sets the depth a sample must exceed to count as wet.
    pub fn with_wet_threshold(mut self, threshold: f64) -> Self {
        self.wet_threshold = threshold;
        self
    }

    /// Treats the period before the series start as a qualifying dry spell.
    pub fn with_assume_dry_before_start(mut self, assume: bool) -> Self {
        self.assume_dry_before_start = assume;
        self
    }

    /// Returns the wet threshold.
    pub fn wet_threshold(&self) -> f64 {
        self.wet_threshold
    }

    /// Returns whether the series start counts as a dry spell.
    pub fn assume_dry_before_start(&self) -> bool {
        self.assume_dry_before_start
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), EventError> {
        if !self.wet_threshold.is_finite() || self.wet_threshold < 0.0 {
            return Err(EventError::InvalidThreshold {
                value: self.wet_threshold,
            });
        }
        Ok(())
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self::new()
    }
}
