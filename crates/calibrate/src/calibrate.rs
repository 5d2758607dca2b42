//! Moment-matching calibration with restarted Nelder-Mead.

use pluvio_model::{ModelMoments, Parameters, theory};
use pluvio_moments::MomentSet;
use tracing::{debug, info, warn};

use crate::config::CalibrationConfig;
use crate::error::CalibrationError;
use crate::guess::guess_from_moments;
use crate::objective::Objective;
use crate::optimizer::nelder_mead;

/// Objective values at or below this are treated as an exact fit.
const ZERO_COST: f64 = 1e-14;

/// Outcome of a successful calibration.
#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationResult {
    params: Parameters,
    objective: f64,
    initial_objective: f64,
    iterations: u64,
    restarts: usize,
    fitted: Vec<ModelMoments>,
}

impl CalibrationResult {
    /// Returns the fitted parameters.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Returns the objective at the fitted parameters.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Returns the objective at the initial guess.
    pub fn initial_objective(&self) -> f64 {
        self.initial_objective
    }

    /// Returns the total number of Nelder-Mead iterations.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Returns how many restarts were run after the first pass.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Returns the theoretical moments at the fitted parameters for each
    /// informative scale.
    pub fn fitted(&self) -> &[ModelMoments] {
        &self.fitted
    }
}

/// Fits Bartlett-Lewis parameters to empirical moments.
///
/// Minimizes `Σ w·((theoretical − empirical) / |empirical|)²` over the
/// informative scales (positive mean and variance) by Nelder-Mead in
/// log-parameter space. The solver restarts from its best point until a
/// run improves the objective by less than the relative `tolerance` or
/// `max_restarts` is reached.
///
/// The starting point is the configured initial guess, or
/// [`guess_from_moments`] when none is set.
///
/// # Errors
///
/// - [`CalibrationError::InvalidConfig`] for a bad configuration.
/// - [`CalibrationError::IllConditioned`] with fewer than two informative
///   scales.
/// - [`CalibrationError::Divergence`] when the objective becomes
///   non-finite, the parameters leave the positive domain, or a non-zero
///   initial objective is never reduced.
#[tracing::instrument(skip(moments, config), fields(n_scales = moments.len()))]
pub fn calibrate(
    moments: &MomentSet,
    config: &CalibrationConfig,
) -> Result<CalibrationResult, CalibrationError> {
    config.validate()?;
    let objective = Objective::new(moments, config.weights())?;
    let initial = match config.initial() {
        Some(p) => *p,
        None => guess_from_moments(moments)?,
    };

    let mut best = initial.to_log().to_vec();
    let initial_cost = objective.evaluate_log(&best);
    let mut best_cost = initial_cost;
    let mut iterations = 0u64;
    let mut restarts = 0usize;
    debug!(%initial, cost = initial_cost, "starting calibration");

    for run in 0..=config.max_restarts() {
        let found = nelder_mead(&objective, &best, config.max_iters()).map_err(|e| {
            warn!(error = %e, run, "Nelder-Mead failed");
            CalibrationError::Divergence {
                last: params_or(&best, initial),
            }
        })?;
        iterations += found.iterations;

        let reduction = if found.cost >= best_cost {
            0.0
        } else if best_cost.is_finite() && best_cost < f64::MAX && best_cost > ZERO_COST {
            (best_cost - found.cost) / best_cost
        } else {
            1.0
        };
        if found.cost < best_cost {
            best = found.log_params;
            best_cost = found.cost;
        }
        restarts = run;
        debug!(run, cost = best_cost, reduction, "Nelder-Mead run finished");

        if reduction < config.tolerance() || best_cost <= ZERO_COST {
            break;
        }
    }

    let last = params_or(&best, initial);
    if !best_cost.is_finite() || best_cost >= f64::MAX {
        warn!(%last, "objective is not finite");
        return Err(CalibrationError::Divergence { last });
    }
    if initial_cost > ZERO_COST && best_cost >= initial_cost {
        warn!(%last, cost = best_cost, "objective was not reduced");
        return Err(CalibrationError::Divergence { last });
    }
    let params = to_params(&best).ok_or(CalibrationError::Divergence { last })?;

    info!(
        %params,
        objective = best_cost,
        initial_objective = initial_cost,
        iterations,
        restarts,
        "calibration finished"
    );
    Ok(CalibrationResult {
        fitted: theory::moments(&params, objective.scales_hours()),
        params,
        objective: best_cost,
        initial_objective: initial_cost,
        iterations,
        restarts,
    })
}

fn to_params(log_params: &[f64]) -> Option<Parameters> {
    let logs = <[f64; 5]>::try_from(log_params).ok()?;
    Parameters::from_log(&logs).ok()
}

fn params_or(log_params: &[f64], fallback: Parameters) -> Parameters {
    to_params(log_params).unwrap_or(fallback)
}
