//! Single-storm simulation and rasterization.

use chrono::TimeDelta;
use rand::Rng;
use rand_distr::Exp1;

use crate::error::ModelError;
use crate::params::Parameters;

/// One rectangular rain pulse, times in hours from the storm origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    /// Arrival offset from the storm origin.
    pub arrival: f64,
    /// Pulse duration.
    pub duration: f64,
    /// Constant intensity in mm/h.
    pub intensity: f64,
}

impl Pulse {
    /// Returns the end offset of the pulse.
    pub fn end(&self) -> f64 {
        self.arrival + self.duration
    }

    /// Returns the depth delivered by the pulse.
    pub fn depth(&self) -> f64 {
        self.intensity * self.duration
    }
}

/// A sampled storm: its lifetime and the pulses it generated.
///
/// The origin pulse arrives at offset 0; further pulses arrive only while
/// the storm is alive but may outlast it.
#[derive(Clone, Debug, PartialEq)]
pub struct Storm {
    lifetime: f64,
    pulses: Vec<Pulse>,
}

fn exponential<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> f64 {
    let e: f64 = rng.sample(Exp1);
    e / rate
}

impl Storm {
    /// Samples a storm.
    ///
    /// Draw order is fixed (lifetime, arrival times, then duration and
    /// intensity per pulse) so a seeded generator reproduces the storm.
    pub fn sample<R: Rng + ?Sized>(params: &Parameters, rng: &mut R) -> Self {
        let lifetime = exponential(rng, params.gamma());
        let kappa = params.pulse_arrival_rate();

        let mut arrivals = vec![0.0];
        let mut t = exponential(rng, kappa);
        while t < lifetime {
            arrivals.push(t);
            t += exponential(rng, kappa);
        }

        let pulses = arrivals
            .into_iter()
            .map(|arrival| {
                let duration = exponential(rng, params.eta());
                let intensity = params.mu() * exponential(rng, 1.0);
                Pulse {
                    arrival,
                    duration,
                    intensity,
                }
            })
            .collect();
        Self { lifetime, pulses }
    }

    /// Returns the storm lifetime in hours.
    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    /// Returns the pulses in arrival order.
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Returns the offset at which the last pulse ends.
    pub fn end(&self) -> f64 {
        self.pulses.iter().map(Pulse::end).fold(0.0, f64::max)
    }

    /// Returns the total depth of all pulses.
    pub fn depth(&self) -> f64 {
        self.pulses.iter().map(Pulse::depth).sum()
    }

    /// Adds the storm's per-step depths to `out`.
    ///
    /// The storm origin sits at `origin` hours after the start of `out`,
    /// whose cells are `step` hours wide. Rain outside `out` is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not positive or a pulse has a negative duration.
    pub fn accumulate(&self, origin: f64, step: f64, out: &mut [f64]) {
        assert!(step > 0.0, "accumulate: step must be positive");
        let span = out.len() as f64 * step;

        for pulse in &self.pulses {
            assert!(
                pulse.duration >= 0.0,
                "accumulate: pulse duration must be non-negative"
            );
            let lo = (origin + pulse.arrival).max(0.0);
            let hi = (origin + pulse.end()).min(span);
            if hi <= lo {
                continue;
            }
            let first = (lo / step).floor() as usize;
            let last = ((hi / step).ceil() as usize).min(out.len());
            for (i, cell) in out.iter_mut().enumerate().take(last).skip(first) {
                let cell_lo = i as f64 * step;
                let overlap = hi.min(cell_lo + step) - lo.max(cell_lo);
                if overlap > 0.0 {
                    *cell += pulse.intensity * overlap;
                }
            }
        }
    }
}

/// A storm rasterized onto a regular grid starting at the storm origin.
#[derive(Clone, Debug, PartialEq)]
pub struct StormProfile {
    step: TimeDelta,
    depths: Vec<f64>,
    storm: Storm,
}

impl StormProfile {
    /// Returns the grid step.
    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Returns the depth per step.
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// Consumes the profile and returns the depths.
    pub fn into_depths(self) -> Vec<f64> {
        self.depths
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Returns true if the profile has no steps.
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Returns the rasterized depth.
    pub fn total(&self) -> f64 {
        self.depths.iter().sum()
    }

    /// Returns the sampled storm.
    pub fn storm(&self) -> &Storm {
        &self.storm
    }
}

/// Simulates one storm and rasterizes it with the given `step`.
///
/// The profile covers `[0, min(storm end, max_duration)]`, rounded up to
/// whole steps and never more than `max_duration / step` steps. Values are
/// depths per step and never negative.
///
/// # Errors
///
/// Returns [`ModelError::InvalidDuration`] if `step` is not positive or
/// `max_duration` is shorter than one step.
pub fn simulate_storm<R: Rng + ?Sized>(
    params: &Parameters,
    max_duration: TimeDelta,
    step: TimeDelta,
    rng: &mut R,
) -> Result<StormProfile, ModelError> {
    let step_s = step.num_seconds();
    if step_s <= 0 {
        return Err(ModelError::InvalidDuration {
            reason: format!("step must be positive, got {step_s} s"),
        });
    }
    let max_steps = (max_duration.num_seconds() / step_s).max(0) as usize;
    if max_steps == 0 {
        return Err(ModelError::InvalidDuration {
            reason: format!(
                "max duration of {} s is shorter than the {step_s} s step",
                max_duration.num_seconds()
            ),
        });
    }

    let step_h = step_s as f64 / 3600.0;
    let storm = Storm::sample(params, rng);
    let n = ((storm.end() / step_h).ceil() as usize).clamp(1, max_steps);
    let mut depths = vec![0.0; n];
    storm.accumulate(0.0, step_h, &mut depths);

    Ok(StormProfile {
        step,
        depths,
        storm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params() -> Parameters {
        Parameters::new(0.02, 4.0, 0.1, 2.0, 1.5).unwrap()
    }

    fn storm(pulses: Vec<Pulse>) -> Storm {
        Storm {
            lifetime: 1.0,
            pulses,
        }
    }

    #[test]
    fn accumulate_splits_pulse_across_cells() {
        let s = storm(vec![Pulse {
            arrival: 0.25,
            duration: 1.0,
            intensity: 2.0,
        }]);
        let mut out = vec![0.0; 3];
        s.accumulate(0.0, 0.5, &mut out);
        assert_relative_eq!(out[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(out[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(out[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn accumulate_superposes_and_clips() {
        let s = storm(vec![
            Pulse {
                arrival: 0.0,
                duration: 2.0,
                intensity: 1.0,
            },
            Pulse {
                arrival: 0.5,
                duration: 0.5,
                intensity: 4.0,
            },
        ]);
        // Origin one hour before the grid: only the last hour of the long
        // pulse lands.
        let mut out = vec![0.0; 2];
        s.accumulate(-1.0, 1.0, &mut out);
        assert_eq!(out, vec![1.0, 0.0]);

        let mut out = vec![0.0; 2];
        s.accumulate(0.0, 1.0, &mut out);
        assert_relative_eq!(out[0], 1.0 + 2.0, epsilon = 1e-12);
        assert_relative_eq!(out[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn sampled_storm_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let s = Storm::sample(&params(), &mut rng);
            assert!(!s.pulses().is_empty());
            assert_eq!(s.pulses()[0].arrival, 0.0);
            assert!(s.pulses().iter().skip(1).all(|p| p.arrival < s.lifetime()));
            assert!(s.pulses().windows(2).all(|w| w[0].arrival < w[1].arrival));
            assert!(s.depth() > 0.0);
        }
    }

    #[test]
    fn profile_keeps_whole_storm_when_uncapped() {
        let mut rng = StdRng::seed_from_u64(11);
        let profile =
            simulate_storm(&params(), TimeDelta::days(365), TimeDelta::minutes(10), &mut rng)
                .unwrap();
        assert_relative_eq!(
            profile.total(),
            profile.storm().depth(),
            max_relative = 1e-9
        );
        assert!(profile.depths().iter().all(|&d| d >= 0.0));
        assert_eq!(profile.step(), TimeDelta::minutes(10));
    }

    #[test]
    fn profile_respects_cap() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let profile =
                simulate_storm(&params(), TimeDelta::hours(1), TimeDelta::minutes(10), &mut rng)
                    .unwrap();
            assert!(profile.len() >= 1 && profile.len() <= 6);
        }
    }

    #[test]
    fn invalid_durations() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = simulate_storm(&params(), TimeDelta::hours(1), TimeDelta::zero(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDuration { .. }));
        let err = simulate_storm(
            &params(),
            TimeDelta::minutes(5),
            TimeDelta::minutes(10),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid duration: max duration of 300 s is shorter than the 600 s step"
        );
    }

    #[test]
    #[should_panic(expected = "accumulate: step must be positive")]
    fn accumulate_zero_step_panics() {
        storm(vec![]).accumulate(0.0, 0.0, &mut [0.0]);
    }
}
