//! Disaggregate command: downscale a coarse series with calibrated parameters.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, info_span};

use pluvio_disagg::{disaggregate_series, disaggregate_series_par};
use pluvio_io::{load_parameters, read_series, write_series};

use crate::cli::DisaggregateArgs;
use crate::config::PluvioConfig;
use crate::convert;

/// Run the disaggregation pipeline.
pub fn run(args: DisaggregateArgs) -> Result<()> {
    let _cmd = info_span!("disaggregate").entered();

    let config = PluvioConfig::load(args.config.as_deref())?;
    let fine_minutes = args
        .fine_step_minutes
        .unwrap_or(config.disaggregation.fine_step_minutes);
    let fine_step = convert::minutes(fine_minutes, "fine step")?;
    let disagg_cfg = convert::build_disagg_config(&config.disaggregation)?;
    let reader_cfg = convert::build_reader_config(&config.io, args.coarse_step_minutes)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let seed = args.seed.or(config.seed);

    let params = load_parameters(&args.params)
        .with_context(|| format!("failed to read parameters: {}", args.params.display()))?;
    info!(%params, "parameters loaded");

    info!(path = %args.input.display(), "reading coarse series");
    let coarse = read_series(&args.input, &reader_cfg)
        .with_context(|| format!("failed to read Parquet: {}", args.input.display()))?;
    info!(
        n = coarse.len(),
        step_minutes = coarse.step().num_minutes(),
        fine_step_minutes = fine_minutes,
        "coarse series loaded"
    );

    let fine = if args.parallel {
        let seed = seed.unwrap_or_else(rand::random);
        disaggregate_series_par(&coarse, fine_step, &params, &disagg_cfg, seed)
    } else {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        disaggregate_series(&coarse, fine_step, &params, &disagg_cfg, &mut rng)
    }
    .context("disaggregation failed")?;

    write_series(&args.output, &fine, &writer_cfg)
        .with_context(|| format!("failed to write Parquet: {}", args.output.display()))?;
    info!(path = %args.output.display(), n = fine.len(), "fine series written");
    Ok(())
}
