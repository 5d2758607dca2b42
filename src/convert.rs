//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};
use chrono::TimeDelta;

use crate::config::*;

use pluvio_calibrate::{CalibrationConfig, MomentWeights};
use pluvio_disagg::{DisaggConfig, FailurePolicy};
use pluvio_events::EventConfig;
use pluvio_io::{Compression, ReaderConfig, WriterConfig};

/// Converts a positive number of minutes into a [`TimeDelta`].
pub fn minutes(value: i64, what: &str) -> Result<TimeDelta> {
    if value <= 0 {
        bail!("{what} must be a positive number of minutes, got {value}");
    }
    match TimeDelta::try_minutes(value) {
        Some(d) => Ok(d),
        None => bail!("{what} of {value} minutes is out of range"),
    }
}

/// Parses a disaggregation failure policy name.
pub fn parse_failure_policy(s: &str) -> Result<FailurePolicy> {
    match s.to_lowercase().as_str() {
        "abort" => Ok(FailurePolicy::Abort),
        "spread" => Ok(FailurePolicy::SpreadUniformly),
        other => bail!("unknown failure policy: {other:?} (expected \"abort\" or \"spread\")"),
    }
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
///
/// `step_override` (minutes, from the command line) takes precedence over
/// `io.step_minutes`; with neither the step comes from the file.
pub fn build_reader_config(io: &IoToml, step_override: Option<i64>) -> Result<ReaderConfig> {
    let mut cfg = ReaderConfig::new().with_fill_gaps(io.fill_gaps);
    if let Some(m) = step_override.or(io.step_minutes) {
        cfg = cfg.with_step(minutes(m, "input step")?);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml) -> Result<WriterConfig> {
    let cfg = WriterConfig::new()
        .with_compression(io.compression.parse::<Compression>()?)
        .with_group_days(io.row_group_days);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds an [`EventConfig`] from the TOML events configuration.
pub fn build_event_config(events: &EventsToml) -> Result<EventConfig> {
    let cfg = EventConfig::new()
        .with_wet_threshold(events.wet_threshold)
        .with_assume_dry_before_start(events.assume_dry_before_start);
    cfg.validate()?;
    Ok(cfg)
}

/// Returns the inter-event gap from the TOML events configuration.
pub fn inter_event_gap(events: &EventsToml) -> Result<TimeDelta> {
    minutes(events.inter_event_gap_minutes, "inter_event_gap_minutes")
}

/// Builds a [`CalibrationConfig`] from the events, moments and calibration sections.
pub fn build_calibration_config(
    events: &EventsToml,
    moments: &MomentsToml,
    calibration: &CalibrationToml,
) -> Result<CalibrationConfig> {
    let scales = moments
        .scales_minutes
        .iter()
        .map(|&m| minutes(m, "scales_minutes entry"))
        .collect::<Result<Vec<_>>>()?;

    let weights = MomentWeights {
        mean: calibration.weights.mean,
        variance: calibration.weights.variance,
        lag1_autocovariance: calibration.weights.lag1_autocovariance,
        dry_probability: calibration.weights.dry_probability,
    };

    let mut cfg = CalibrationConfig::new()
        .with_max_iters(calibration.max_iters)
        .with_max_restarts(calibration.max_restarts)
        .with_tolerance(calibration.tolerance)
        .with_weights(weights)
        .with_scales(scales)
        .with_intra_event_gap(minutes(
            events.intra_event_gap_minutes,
            "intra_event_gap_minutes",
        )?)
        .with_events(build_event_config(events)?);
    if let Some(initial) = calibration.initial {
        cfg = cfg.with_initial(initial);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`DisaggConfig`] from the TOML disaggregation configuration.
pub fn build_disagg_config(disagg: &DisaggregationToml) -> Result<DisaggConfig> {
    let cfg = DisaggConfig::new()
        .with_max_retries(disagg.max_retries)
        .with_on_failure(parse_failure_policy(&disagg.on_failure)?);
    cfg.validate()?;
    Ok(cfg)
}
