//! Long synthetic records from superposed storms.

use chrono::{NaiveDateTime, TimeDelta};
use pluvio_series::TimeSeries;
use rand::Rng;
use rand_distr::Exp1;
use tracing::debug;

use crate::error::ModelError;
use crate::params::Parameters;
use crate::storm::Storm;

/// Length of the spin-up period before the record, in units of the
/// slowest storm or pulse decay time.
const SPIN_UP: f64 = 10.0;

/// Simulates `n_steps` of rainfall at `step` starting at `start`.
///
/// Storm origins form a Poisson process of rate λ, starting a spin-up
/// period before `start` so the record begins in the stationary regime.
/// Each storm is rasterized and superposed.
///
/// # Errors
///
/// Returns [`ModelError::InvalidDuration`] for a non-positive step or when
/// `n_steps` is zero.
#[tracing::instrument(skip(params, rng))]
pub fn simulate_series<R: Rng + ?Sized>(
    params: &Parameters,
    start: NaiveDateTime,
    n_steps: usize,
    step: TimeDelta,
    rng: &mut R,
) -> Result<TimeSeries, ModelError> {
    let step_s = step.num_seconds();
    if step_s <= 0 {
        return Err(ModelError::InvalidDuration {
            reason: format!("step must be positive, got {step_s} s"),
        });
    }
    if n_steps == 0 {
        return Err(ModelError::InvalidDuration {
            reason: "series must have at least one step".to_string(),
        });
    }
    let step_h = step_s as f64 / 3600.0;
    let span = n_steps as f64 * step_h;
    let spin_up = SPIN_UP / params.gamma().min(params.eta());

    let mut values = vec![0.0; n_steps];
    let mut n_storms = 0usize;
    let mut origin = -spin_up + next_gap(params, rng);
    while origin < span {
        Storm::sample(params, rng).accumulate(origin, step_h, &mut values);
        n_storms += 1;
        origin += next_gap(params, rng);
    }
    debug!(n_storms, span_hours = span, "synthetic series generated");

    Ok(TimeSeries::new(start, step, values)?)
}

fn next_gap<R: Rng + ?Sized>(params: &Parameters, rng: &mut R) -> f64 {
    let e: f64 = rng.sample(Exp1);
    e / params.lambda()
}
