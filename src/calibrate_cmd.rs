//! Calibrate command: fit Bartlett-Lewis parameters to an observed series.

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use pluvio_calibrate::calibrate_series;
use pluvio_io::{read_series, save_parameters};

use crate::cli::CalibrateArgs;
use crate::config::PluvioConfig;
use crate::convert;

/// Run the calibration pipeline.
pub fn run(args: CalibrateArgs) -> Result<()> {
    let _cmd = info_span!("calibrate").entered();

    let config = PluvioConfig::load(args.config.as_deref())?;
    let reader_cfg = convert::build_reader_config(&config.io, None)?;
    let calibration_cfg =
        convert::build_calibration_config(&config.events, &config.moments, &config.calibration)?;
    let gap = convert::inter_event_gap(&config.events)?;

    info!(path = %args.input.display(), "reading fine series");
    let series = read_series(&args.input, &reader_cfg)
        .with_context(|| format!("failed to read Parquet: {}", args.input.display()))?;
    info!(
        n = series.len(),
        step_minutes = series.step().num_minutes(),
        total = series.total(),
        "series loaded"
    );

    let result = calibrate_series(&series, gap, &calibration_cfg).context("calibration failed")?;
    info!(
        params = %result.params(),
        objective = result.objective(),
        initial_objective = result.initial_objective(),
        iterations = result.iterations(),
        restarts = result.restarts(),
        "calibration finished"
    );
    for m in result.fitted() {
        debug!(
            scale_hours = m.scale_hours,
            mean = m.mean,
            variance = m.variance,
            lag1_autocovariance = m.lag1_autocovariance,
            dry_probability = m.dry_probability,
            "fitted moments"
        );
    }

    match args.output {
        Some(path) => {
            save_parameters(&path, result.params())
                .with_context(|| format!("failed to write parameters: {}", path.display()))?;
            info!(path = %path.display(), "parameters written");
        }
        None => print!("{}", result.params().to_toml()?),
    }
    Ok(())
}
