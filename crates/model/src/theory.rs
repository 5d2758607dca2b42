//! Closed-form moments of aggregated Bartlett-Lewis rainfall.
//!
//! With `κ = βγ`, `μ_c = 1 + β` and exponential intensities (`E[X²] = 2μ²`)
//! the covariance density of the continuous intensity process is
//!
//! ```text
//! c(τ) = A·e^(−ητ) + B·e^(−γτ)
//! A = λ μ_c (2μ² − κμ²γ / (η² − γ²)) / η
//! B = λ μ_c κ μ² / (η² − γ²)
//! ```
//!
//! and the moments of depths aggregated over windows of `h` hours follow by
//! integrating `c` over one or two windows. The dry probability is
//! `exp(−λ·E[Mₕ])`, where `Mₕ` is the length of the set of window start
//! times for which one storm touches the window.

use pluvio_stats::{gauss_legendre, geometric_breaks};

use crate::params::Parameters;

/// Relative separation below which `γ` is nudged away from `η`.
const NUDGE: f64 = 1e-4;

/// Tail cut-off of the dry-probability integrals, in units of the slowest
/// decay time.
const TAIL: f64 = 36.0;

/// First quadrature panel width, in units of the fastest decay time.
const FIRST_PANEL: f64 = 0.05;

/// Largest quadrature panel width, in units of the slowest decay time.
const MAX_PANEL: f64 = 4.0;

/// Theoretical statistics of depths aggregated to one window length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelMoments {
    /// Window length in hours.
    pub scale_hours: f64,
    pub mean: f64,
    pub variance: f64,
    pub lag1_autocovariance: f64,
    pub dry_probability: f64,
}

/// Coefficients of the two-exponential covariance density.
#[derive(Clone, Copy, Debug)]
struct Covariance {
    a: f64,
    b: f64,
    eta: f64,
    gamma: f64,
}

impl Covariance {
    fn new(params: &Parameters) -> Self {
        let eta = params.eta();
        let mut gamma = params.gamma();
        if (eta - gamma).abs() < NUDGE * eta {
            gamma = eta * (1.0 - NUDGE);
        }
        let lambda = params.lambda();
        let mu = params.mu();
        let mu_c = params.mean_pulses_per_storm();
        let kappa = params.beta() * gamma;
        let denom = eta * eta - gamma * gamma;

        let b = lambda * mu_c * kappa * mu * mu / denom;
        let a = lambda * mu_c * (2.0 * mu * mu - kappa * mu * mu * gamma / denom) / eta;
        Self { a, b, eta, gamma }
    }

    fn variance(&self, h: f64) -> f64 {
        self.a * window_variance(self.eta, h) + self.b * window_variance(self.gamma, h)
    }

    fn autocovariance(&self, h: f64, lag: usize) -> f64 {
        self.a * window_covariance(self.eta, h, lag) + self.b * window_covariance(self.gamma, h, lag)
    }
}

/// `∫∫ e^(−r|t−s|)` over one window of length `h`.
fn window_variance(rate: f64, h: f64) -> f64 {
    let x = rate * h;
    2.0 * (x + (-x).exp_m1()) / (rate * rate)
}

/// `∫∫ e^(−r(t−s))` between two windows `lag` windows apart.
fn window_covariance(rate: f64, h: f64, lag: usize) -> f64 {
    let x = rate * h;
    let one = (-x).exp_m1();
    one * one * (-x * (lag as f64 - 1.0)).exp() / (rate * rate)
}

/// Mean depth over a window of `h` hours.
pub fn mean(params: &Parameters, h: f64) -> f64 {
    params.lambda() * params.mean_pulses_per_storm() * params.mu() * h / params.eta()
}

/// Variance of the depth over a window of `h` hours.
pub fn variance(params: &Parameters, h: f64) -> f64 {
    Covariance::new(params).variance(h)
}

/// Covariance between depths of windows `lag >= 1` windows apart.
///
/// # Panics
///
/// Panics if `lag` is zero; use [`variance`] instead.
pub fn autocovariance(params: &Parameters, h: f64, lag: usize) -> f64 {
    assert!(lag >= 1, "autocovariance: lag must be at least 1");
    Covariance::new(params).autocovariance(h, lag)
}

/// Probability that a window of `h` hours receives no rain.
pub fn dry_probability(params: &Parameters, h: f64) -> f64 {
    DryIntegrals::new(params).dry_probability(params, h)
}

/// Theoretical moments at each of `scales_hours`.
///
/// Shares the quadrature work across scales, so prefer this over calling
/// [`dry_probability`] per scale.
pub fn moments(params: &Parameters, scales_hours: &[f64]) -> Vec<ModelMoments> {
    let cov = Covariance::new(params);
    let dry = DryIntegrals::new(params);
    scales_hours
        .iter()
        .map(|&h| ModelMoments {
            scale_hours: h,
            mean: mean(params, h),
            variance: cov.variance(h),
            lag1_autocovariance: cov.autocovariance(h, 1),
            dry_probability: dry.dry_probability(params, h),
        })
        .collect()
}

/// The two window-independent integrals of the dry-probability formula.
///
/// For a storm starting `t` hours before the window, the probability that
/// it misses the window is
/// `(1 − e^(−ηt)) · (p_dead(t) + p_alive(t)·F(h))`: the origin pulse ends
/// before the window, and either the storm dies before the window with all
/// its pulses ended, or it is still alive at the window start and produces
/// no pulse during the window. Only `F` depends on `h`, so
/// `E[Mₕ] = h + I₁ − F(h)·I₂` with
/// `I₁ = ∫(1 − (1 − e^(−ηt))·p_dead(t)) dt` and
/// `I₂ = ∫(1 − e^(−ηt))·p_alive(t) dt`.
#[derive(Clone, Copy, Debug)]
struct DryIntegrals {
    i1: f64,
    i2: f64,
}

impl DryIntegrals {
    fn new(params: &Parameters) -> Self {
        let gamma = params.gamma();
        let eta = params.eta();
        let kappa = params.pulse_arrival_rate();
        let slow = gamma.min(eta);
        let fast = gamma.max(eta).max(kappa);
        let first = FIRST_PANEL / fast;
        let widest = MAX_PANEL / slow;

        let origin_miss = |t: f64| -(-eta * t).exp_m1();
        let alive_miss = |t: f64| (-gamma * t + kappa / eta * (-eta * t).exp_m1()).exp();
        let dead_miss = |t: f64| {
            let tail = (-eta * t).exp();
            let inner = geometric_breaks(t, first, widest);
            // d is the time between storm death and window start.
            gauss_legendre(&inner, |d| {
                gamma * (-gamma * (t - d) - kappa / eta * ((-eta * d).exp() - tail)).exp()
            })
        };

        let outer = geometric_breaks(TAIL / slow, first, widest);
        let i1 = gauss_legendre(&outer, |t| 1.0 - origin_miss(t) * dead_miss(t));
        let i2 = gauss_legendre(&outer, |t| origin_miss(t) * alive_miss(t));
        Self { i1, i2 }
    }

    fn dry_probability(&self, params: &Parameters, h: f64) -> f64 {
        let gamma = params.gamma();
        let kappa = params.pulse_arrival_rate();
        let alive_factor = (gamma + kappa * (-(gamma + kappa) * h).exp()) / (gamma + kappa);
        let exposure = h + self.i1 - alive_factor * self.i2;
        (-params.lambda() * exposure).exp().clamp(0.0, 1.0)
    }
}
