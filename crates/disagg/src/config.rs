//! Configuration for disaggregation.

use crate::error::DisaggError;

/// What to do with an interval for which no usable storm was drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop and return [`DisaggError::Failure`].
    #[default]
    Abort,
    /// Spread the observed depth evenly over the interval and continue.
    SpreadUniformly,
}

/// Configuration for disaggregation.
///
/// # Example
///
/// ```
/// use pluvio_disagg::{DisaggConfig, FailurePolicy};
///
/// let config = DisaggConfig::new()
///     .with_max_retries(50)
///     .with_on_failure(FailurePolicy::SpreadUniformly);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct DisaggConfig {
    max_retries: usize,
    on_failure: FailurePolicy,
}

impl DisaggConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `max_retries = 100`, `on_failure = Abort`.
    pub fn new() -> Self {
        Self {
            max_retries: 100,
            on_failure: FailurePolicy::Abort,
        }
    }

    /// Sets the number of storms drawn per interval before giving up.
    pub fn with_max_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the failure policy used by the batch functions.
    pub fn with_on_failure(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub fn on_failure(&self) -> FailurePolicy {
        self.on_failure
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), DisaggError> {
        if self.max_retries == 0 {
            return Err(DisaggError::InvalidConfig {
                reason: "max_retries must be > 0".into(),
            });
        }
        Ok(())
    }
}

impl Default for DisaggConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = DisaggConfig::new();
        assert_eq!(cfg.max_retries(), 100);
        assert_eq!(cfg.on_failure(), FailurePolicy::Abort);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_retries_rejected() {
        assert!(DisaggConfig::new().with_max_retries(0).validate().is_err());
    }
}
