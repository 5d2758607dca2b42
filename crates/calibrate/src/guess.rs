//! Heuristic starting points for the optimizer.

use pluvio_events::EventSummary;
use pluvio_model::Parameters;
use pluvio_moments::MomentSet;

use crate::error::CalibrationError;

const DEFAULT_ETA: f64 = 2.0;
const DEFAULT_GAMMA: f64 = 0.5;
const DEFAULT_BETA: f64 = 3.0;
const MIN_BETA: f64 = 0.1;

/// Guesses parameters from the finest informative scale of `moments`.
///
/// Storm and pulse rates take typical values; λ is chosen so that a
/// window of the finest scale is dry with the observed probability, and μ
/// so that the mean matches.
///
/// # Errors
///
/// Returns [`CalibrationError::IllConditioned`] if no scale is informative.
pub fn guess_from_moments(moments: &MomentSet) -> Result<Parameters, CalibrationError> {
    let finest = moments
        .iter()
        .find(|m| m.is_informative())
        .ok_or(CalibrationError::IllConditioned { valid_scales: 0 })?;
    let h = finest.scale_hours();
    let p_dry = finest.dry_probability.clamp(0.01, 0.99);

    let lambda = -p_dry.ln() / (h + 1.0 / DEFAULT_GAMMA + 1.0 / DEFAULT_ETA);
    let mu = finest.mean * DEFAULT_ETA / (lambda * (1.0 + DEFAULT_BETA) * h);
    Ok(Parameters::new(
        lambda,
        DEFAULT_BETA,
        DEFAULT_GAMMA,
        DEFAULT_ETA,
        mu,
    )?)
}

/// Guesses parameters from event statistics.
///
/// λ is the event rate, β the mean number of extra pulses per event, η the
/// inverse mean pulse duration, γ the inverse of the event time not
/// explained by one pulse, and μ matches the mean event depth.
///
/// # Errors
///
/// Returns [`CalibrationError::Model`] if the summary yields a
/// non-positive value.
pub fn guess_from_events(summary: &EventSummary) -> Result<Parameters, CalibrationError> {
    let lambda = summary.events_per_hour();
    let beta = (summary.mean_pulses_per_event() - 1.0).max(MIN_BETA);
    let pulse = summary.mean_pulse_duration_hours();
    let eta = 1.0 / pulse;
    let duration = summary.mean_duration_hours();
    let storm = (duration - pulse).max(0.5 * duration);
    let gamma = 1.0 / storm;
    let mu = summary.mean_volume() * eta / (1.0 + beta);
    Ok(Parameters::new(lambda, beta, gamma, eta, mu)?)
}
