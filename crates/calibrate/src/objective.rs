//! Weighted relative-error objective over empirical moments.

use argmin::core::CostFunction;
use pluvio_model::{ModelMoments, Parameters, theory};
use pluvio_moments::{MomentSet, ScaleMoments};

use crate::config::MomentWeights;
use crate::error::CalibrationError;

/// Empirical values below this magnitude are left out of the objective.
const MIN_TARGET: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
enum Statistic {
    Mean,
    Variance,
    Lag1,
    Dry,
}

impl Statistic {
    fn of(self, m: &ModelMoments) -> f64 {
        match self {
            Statistic::Mean => m.mean,
            Statistic::Variance => m.variance,
            Statistic::Lag1 => m.lag1_autocovariance,
            Statistic::Dry => m.dry_probability,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Target {
    scale: usize,
    statistic: Statistic,
    value: f64,
    weight: f64,
}

/// `Σ w·((theoretical − empirical) / |empirical|)²` over the informative
/// scales of a [`MomentSet`].
#[derive(Clone, Debug)]
pub(crate) struct Objective {
    scales_hours: Vec<f64>,
    targets: Vec<Target>,
}

impl Objective {
    /// Builds the objective from the informative scales of `moments`.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::IllConditioned`] when fewer than two
    /// scales have positive mean and variance.
    pub(crate) fn new(moments: &MomentSet, weights: &MomentWeights) -> Result<Self, CalibrationError> {
        let informative: Vec<&ScaleMoments> =
            moments.iter().filter(|m| m.is_informative()).collect();
        if informative.len() < 2 {
            return Err(CalibrationError::IllConditioned {
                valid_scales: informative.len(),
            });
        }

        let mut targets = Vec::new();
        for (scale, m) in informative.iter().enumerate() {
            let candidates = [
                (Statistic::Mean, m.mean, weights.mean),
                (Statistic::Variance, m.variance, weights.variance),
                (Statistic::Lag1, m.lag1_autocovariance, weights.lag1_autocovariance),
                (Statistic::Dry, m.dry_probability, weights.dry_probability),
            ];
            for (statistic, value, weight) in candidates {
                if value.abs() >= MIN_TARGET && weight > 0.0 {
                    targets.push(Target {
                        scale,
                        statistic,
                        value,
                        weight,
                    });
                }
            }
        }

        Ok(Self {
            scales_hours: informative.iter().map(|m| m.scale_hours()).collect(),
            targets,
        })
    }

    /// Returns the window lengths of the informative scales in hours.
    pub(crate) fn scales_hours(&self) -> &[f64] {
        &self.scales_hours
    }

    /// Evaluates the objective at `params`.
    pub(crate) fn evaluate(&self, params: &Parameters) -> f64 {
        let theo = theory::moments(params, &self.scales_hours);
        self.targets
            .iter()
            .map(|t| {
                let rel = (t.statistic.of(&theo[t.scale]) - t.value) / t.value.abs();
                t.weight * rel * rel
            })
            .sum()
    }

    /// Evaluates the objective at log-parameters, mapping points outside
    /// the valid domain to `f64::MAX`.
    pub(crate) fn evaluate_log(&self, log_params: &[f64]) -> f64 {
        let Ok(logs) = <[f64; 5]>::try_from(log_params) else {
            return f64::MAX;
        };
        match Parameters::from_log(&logs) {
            Ok(params) => {
                let cost = self.evaluate(&params);
                if cost.is_finite() { cost } else { f64::MAX }
            }
            Err(_) => f64::MAX,
        }
    }
}

/// Cost function for argmin over log-parameters.
pub(crate) struct LogCost<'a> {
    pub(crate) objective: &'a Objective,
}

impl CostFunction for LogCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.objective.evaluate_log(params))
    }
}
