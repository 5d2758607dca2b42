//! Simulate command: generate a synthetic series from model parameters.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, info_span};

use pluvio_io::{load_parameters, write_series};
use pluvio_model::{simulate_series, theory};

use crate::cli::SimulateArgs;
use crate::config::PluvioConfig;
use crate::convert;

const MINUTES_PER_DAY: i64 = 1440;

/// Run the synthetic series generator.
pub fn run(args: SimulateArgs) -> Result<()> {
    let _cmd = info_span!("simulate").entered();

    if args.days == 0 {
        bail!("--days must be at least 1");
    }
    let step = convert::minutes(args.step_minutes, "step")?;
    if MINUTES_PER_DAY % args.step_minutes != 0 {
        bail!(
            "step of {} minutes does not divide one day",
            args.step_minutes
        );
    }
    let n_steps = args.days as usize * (MINUTES_PER_DAY / args.step_minutes) as usize;
    let start = NaiveDate::parse_from_str(&args.start, "%Y-%m-%d")
        .with_context(|| format!("invalid start date: {:?}", args.start))?
        .and_time(NaiveTime::MIN);

    let config = PluvioConfig::load(args.config.as_deref())?;
    let writer_cfg = convert::build_writer_config(&config.io)?;

    let params = load_parameters(&args.params)
        .with_context(|| format!("failed to read parameters: {}", args.params.display()))?;
    info!(%params, "parameters loaded");

    let mut rng = match args.seed.or(config.seed) {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let series =
        simulate_series(&params, start, n_steps, step, &mut rng).context("simulation failed")?;
    info!(
        n = series.len(),
        total = series.total(),
        expected_total = theory::mean(&params, series.step_hours()) * series.len() as f64,
        "synthetic series generated"
    );

    write_series(&args.output, &series, &writer_cfg)
        .with_context(|| format!("failed to write Parquet: {}", args.output.display()))?;
    info!(path = %args.output.display(), "synthetic series written");
    Ok(())
}
