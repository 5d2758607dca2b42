//! Nelder-Mead minimization of the calibration objective.
//!
//! Wraps the `argmin` crate. **Not part of the public API.**

use argmin::core::{Executor, State};
use argmin::solver::neldermead::NelderMead;

use crate::objective::{LogCost, Objective};

/// Edge length of the initial simplex in log-parameter space.
const SIMPLEX_STEP: f64 = 0.5;

/// Standard deviation of vertex costs at which a run stops early.
const SD_TOLERANCE: f64 = 1e-12;

/// Best point of one Nelder-Mead run.
#[derive(Clone, Debug)]
pub(crate) struct Minimum {
    pub(crate) log_params: Vec<f64>,
    pub(crate) cost: f64,
    pub(crate) iterations: u64,
}

/// Runs Nelder-Mead from `start` for at most `max_iters` iterations.
///
/// The simplex is `start` plus one vertex per coordinate displaced by
/// [`SIMPLEX_STEP`].
pub(crate) fn nelder_mead(
    objective: &Objective,
    start: &[f64],
    max_iters: u64,
) -> Result<Minimum, argmin::core::Error> {
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for i in 0..start.len() {
        let mut vertex = start.to_vec();
        vertex[i] += SIMPLEX_STEP;
        simplex.push(vertex);
    }

    let solver = NelderMead::new(simplex).with_sd_tolerance(SD_TOLERANCE)?;
    let result = Executor::new(LogCost { objective }, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()?;

    let state = result.state();
    let log_params = state
        .get_best_param()
        .cloned()
        .unwrap_or_else(|| start.to_vec());
    Ok(Minimum {
        cost: objective.evaluate_log(&log_params),
        log_params,
        iterations: state.get_iter(),
    })
}
