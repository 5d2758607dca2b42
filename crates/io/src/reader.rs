//! High-level series reading.

use std::path::Path;

use chrono::{NaiveDateTime, TimeDelta};
use pluvio_series::TimeSeries;
use tracing::{debug, info};

use crate::error::IoError;
use crate::parquet_read;

/// Configuration for reading a rainfall series from Parquet.
///
/// # Example
///
/// ```
/// use chrono::TimeDelta;
/// use pluvio_io::ReaderConfig;
///
/// let config = ReaderConfig::new()
///     .with_step(TimeDelta::minutes(10))
///     .with_fill_gaps(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    step: Option<TimeDelta>,
    fill_gaps: bool,
}

impl ReaderConfig {
    /// Creates a configuration that takes the step from the file and rejects gaps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the sampling step instead of taking it from the file.
    pub fn with_step(mut self, step: TimeDelta) -> Self {
        self.step = Some(step);
        self
    }

    /// Fills missing steps with zero depth instead of rejecting them.
    pub fn with_fill_gaps(mut self, fill: bool) -> Self {
        self.fill_gaps = fill;
        self
    }

    /// Returns the configured step, if any.
    pub fn step(&self) -> Option<TimeDelta> {
        self.step
    }

    /// Returns whether missing steps are zero-filled.
    pub fn fill_gaps(&self) -> bool {
        self.fill_gaps
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if a fixed step is not positive.
    pub fn validate(&self) -> Result<(), IoError> {
        if let Some(step) = self.step
            && step <= TimeDelta::zero()
        {
            return Err(IoError::Validation {
                count: 1,
                details: format!("step must be positive, got {} s", step.num_seconds()),
            });
        }
        Ok(())
    }
}

/// Infers the sampling step as the smallest positive spacing between
/// consecutive records.
fn infer_step(records: &[(NaiveDateTime, f64)]) -> Result<TimeDelta, IoError> {
    records
        .windows(2)
        .map(|pair| pair[1].0 - pair[0].0)
        .filter(|d| *d > TimeDelta::zero())
        .min()
        .ok_or_else(|| IoError::Validation {
            count: 1,
            details: "cannot infer the step from fewer than two distinct timestamps".to_string(),
        })
}

/// Reads a rainfall series from a Parquet file with `timestamp` (Int64,
/// epoch seconds, UTC) and `precip` (Float64) columns.
///
/// Rows must be in chronological order. Without gap filling every pair of
/// consecutive rows must be exactly one step apart.
///
/// The step is the configured one if set, else the step stored by
/// [`write_series`](crate::write_series), else the smallest spacing between
/// rows.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file,
/// [`IoError::Validation`] for a schema mismatch or when the step must be
/// inferred from fewer than two rows, and [`IoError::Series`] for gaps or
/// invalid depths.
#[tracing::instrument(skip(config))]
pub fn read_series(path: &Path, config: &ReaderConfig) -> Result<TimeSeries, IoError> {
    config.validate()?;

    let file = parquet_read::read_batches(path)?;
    let records = parquet_read::batches_to_records(&file.batches)?;
    debug!(rows = records.len(), batches = file.batches.len(), "records read");

    let step = match config.step.or(file.stored_step) {
        Some(step) => step,
        None => infer_step(&records)?,
    };

    let series = if config.fill_gaps {
        TimeSeries::from_records_zero_filled(&records, step)?
    } else {
        TimeSeries::from_records(&records, step)?
    };

    let filled = series.len() - records.len();
    if filled > 0 {
        info!(filled, "missing steps filled with zero depth");
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn t(minute: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + TimeDelta::minutes(minute)
    }

    #[test]
    fn default_config() {
        let config = ReaderConfig::new();
        assert!(config.step().is_none());
        assert!(!config.fill_gaps());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_non_positive_step() {
        let config = ReaderConfig::new().with_step(TimeDelta::zero());
        assert!(matches!(
            config.validate().unwrap_err(),
            IoError::Validation { count: 1, .. }
        ));
    }

    #[test]
    fn infer_step_uses_smallest_spacing() {
        let records = [(t(0), 0.0), (t(20), 1.0), (t(30), 0.0)];
        assert_eq!(infer_step(&records).unwrap(), TimeDelta::minutes(10));
    }

    #[test]
    fn infer_step_needs_two_records() {
        assert!(infer_step(&[(t(0), 1.0)]).is_err());
        assert!(infer_step(&[]).is_err());
    }
}
