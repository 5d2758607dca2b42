//! Disaggregation of coarse depths into fine-step profiles.

use chrono::TimeDelta;
use pluvio_model::{Parameters, simulate_storm};
use pluvio_series::{TimeSeries, steps_in};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{DisaggConfig, FailurePolicy};
use crate::error::DisaggError;

/// Splits one observed coarse depth into `coarse_duration / fine_step`
/// fine-step depths.
///
/// A zero observation gives all zeros. Otherwise storms capped at the
/// coarse duration are drawn until one has positive depth; it is placed at
/// a random whole-step offset when shorter than the interval and rescaled
/// so the output sums to `observed` (within 1e-9 relative).
///
/// # Errors
///
/// - [`DisaggError::InvalidObserved`] for a negative or non-finite value.
/// - [`DisaggError::Series`] if `coarse_duration` is not a positive
///   multiple of `fine_step`.
/// - [`DisaggError::Failure`] if `max_retries` storms all had zero depth.
pub fn disaggregate<R: Rng + ?Sized>(
    observed: f64,
    coarse_duration: TimeDelta,
    fine_step: TimeDelta,
    params: &Parameters,
    config: &DisaggConfig,
    rng: &mut R,
) -> Result<Vec<f64>, DisaggError> {
    config.validate()?;
    disaggregate_interval(0, observed, coarse_duration, fine_step, params, config, rng)
}

fn disaggregate_interval<R: Rng + ?Sized>(
    interval: usize,
    observed: f64,
    coarse_duration: TimeDelta,
    fine_step: TimeDelta,
    params: &Parameters,
    config: &DisaggConfig,
    rng: &mut R,
) -> Result<Vec<f64>, DisaggError> {
    if !observed.is_finite() || observed < 0.0 {
        return Err(DisaggError::InvalidObserved { value: observed });
    }
    let n = steps_in(coarse_duration, fine_step)?;
    if observed == 0.0 {
        return Ok(vec![0.0; n]);
    }

    for attempt in 1..=config.max_retries() {
        let profile = simulate_storm(params, coarse_duration, fine_step, rng)?;
        if let Some(weights) = normalized(profile.depths()) {
            return Ok(place(&weights, n, observed, rng));
        }
        debug!(interval, attempt, "storm without usable depth, redrawing");
    }
    Err(DisaggError::Failure {
        interval,
        observed,
        retries: config.max_retries(),
    })
}

/// Divides `depths` by their maximum so the largest weight is 1.
///
/// Returns `None` when the profile has no positive depth or holds a
/// non-finite value. Subnormal totals still give finite weights.
fn normalized(depths: &[f64]) -> Option<Vec<f64>> {
    let peak = depths.iter().copied().fold(0.0_f64, f64::max);
    if !(peak.is_finite() && peak > 0.0) || depths.iter().any(|d| !d.is_finite()) {
        return None;
    }
    Some(depths.iter().map(|d| d / peak).collect())
}

/// Positions `weights` inside `n` steps and rescales them to sum to
/// `observed`; the rounding residual goes to the largest sample.
fn place<R: Rng + ?Sized>(weights: &[f64], n: usize, observed: f64, rng: &mut R) -> Vec<f64> {
    let m = weights.len().min(n);
    let offset = if m < n { rng.random_range(0..=n - m) } else { 0 };
    let scale = observed / weights[..m].iter().sum::<f64>();

    let mut out = vec![0.0; n];
    for (slot, &w) in out[offset..offset + m].iter_mut().zip(weights) {
        *slot = w * scale;
    }
    let residual = observed - out.iter().sum::<f64>();
    if let Some((largest, _)) = out.iter().enumerate().max_by(|a, b| a.1.total_cmp(b.1)) {
        out[largest] += residual;
    }
    out
}

fn apply_policy<R: Rng + ?Sized>(
    interval: usize,
    observed: f64,
    coarse_duration: TimeDelta,
    fine_step: TimeDelta,
    params: &Parameters,
    config: &DisaggConfig,
    rng: &mut R,
) -> Result<Vec<f64>, DisaggError> {
    match disaggregate_interval(interval, observed, coarse_duration, fine_step, params, config, rng)
    {
        Err(DisaggError::Failure { retries, .. })
            if config.on_failure() == FailurePolicy::SpreadUniformly =>
        {
            let n = steps_in(coarse_duration, fine_step)?;
            warn!(interval, observed, retries, "spreading interval uniformly");
            Ok(vec![observed / n as f64; n])
        }
        other => other,
    }
}

/// Disaggregates every interval of `coarse` to `fine_step`, in order,
/// drawing from `rng`.
///
/// The output starts at the same time as `coarse`; interval `i` maps to
/// fine samples `i·k .. (i+1)·k` with `k = coarse.step() / fine_step`.
///
/// # Errors
///
/// As [`disaggregate`]; with [`FailurePolicy::SpreadUniformly`] a failed
/// interval is spread evenly instead of aborting.
#[tracing::instrument(skip(coarse, params, config, rng), fields(n = coarse.len()))]
pub fn disaggregate_series<R: Rng + ?Sized>(
    coarse: &TimeSeries,
    fine_step: TimeDelta,
    params: &Parameters,
    config: &DisaggConfig,
    rng: &mut R,
) -> Result<TimeSeries, DisaggError> {
    config.validate()?;
    let k = steps_in(coarse.step(), fine_step)?;

    let mut values = Vec::with_capacity(coarse.len() * k);
    for (i, &observed) in coarse.values().iter().enumerate() {
        values.extend(apply_policy(
            i,
            observed,
            coarse.step(),
            fine_step,
            params,
            config,
            rng,
        )?);
    }
    info!(n_fine = values.len(), "disaggregation finished");
    Ok(TimeSeries::new(coarse.start(), fine_step, values)?)
}

/// Parallel [`disaggregate_series`].
///
/// Each interval draws from its own `StdRng` seeded from `(seed, index)`,
/// so the output depends only on `seed`, never on thread scheduling. If
/// several intervals fail, which failure is reported is unspecified.
///
/// # Errors
///
/// As [`disaggregate_series`].
#[tracing::instrument(skip(coarse, params, config), fields(n = coarse.len()))]
pub fn disaggregate_series_par(
    coarse: &TimeSeries,
    fine_step: TimeDelta,
    params: &Parameters,
    config: &DisaggConfig,
    seed: u64,
) -> Result<TimeSeries, DisaggError> {
    config.validate()?;
    steps_in(coarse.step(), fine_step)?;

    let blocks: Vec<Vec<f64>> = coarse
        .values()
        .par_iter()
        .enumerate()
        .map(|(i, &observed)| {
            let mut rng = StdRng::seed_from_u64(interval_seed(seed, i));
            apply_policy(
                i,
                observed,
                coarse.step(),
                fine_step,
                params,
                config,
                &mut rng,
            )
        })
        .collect::<Result<_, _>>()?;

    let values = blocks.concat();
    info!(n_fine = values.len(), "parallel disaggregation finished");
    Ok(TimeSeries::new(coarse.start(), fine_step, values)?)
}

/// SplitMix64 finalizer over the seed and interval index.
fn interval_seed(seed: u64, index: usize) -> u64 {
    let mut z = seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
