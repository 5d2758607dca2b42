use approx::assert_relative_eq;
use chrono::{NaiveDate, TimeDelta};
use pluvio_model::{ModelError, Parameters, Storm, simulate_series, simulate_storm, theory};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn params() -> Parameters {
    Parameters::new(0.02, 4.0, 0.1, 2.0, 1.5).unwrap()
}

#[test]
fn same_seed_same_storm() {
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        simulate_storm(&params(), TimeDelta::hours(6), TimeDelta::minutes(10), &mut rng)
            .unwrap()
            .into_depths()
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn mean_pulse_count_is_one_plus_beta() {
    let p = params();
    let mut rng = StdRng::seed_from_u64(7);
    let n = 20_000;
    let total: usize = (0..n)
        .map(|_| Storm::sample(&p, &mut rng).pulses().len())
        .sum();
    assert_relative_eq!(total as f64 / n as f64, 5.0, max_relative = 0.05);
}

#[test]
fn synthetic_series_matches_theory() {
    let p = params();
    let t0 = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let hours = 5000 * 24;
    let series = simulate_series(&p, t0, hours, TimeDelta::hours(1), &mut rng).unwrap();
    assert_eq!(series.len(), hours);
    assert!(series.values().iter().all(|&v| v >= 0.0));

    let mean = series.total() / hours as f64;
    assert_relative_eq!(mean, theory::mean(&p, 1.0), max_relative = 0.15);

    let dry = series.values().iter().filter(|&&v| v == 0.0).count() as f64 / hours as f64;
    assert!(
        (dry - theory::dry_probability(&p, 1.0)).abs() < 0.03,
        "empirical {dry} vs theoretical {}",
        theory::dry_probability(&p, 1.0)
    );
}

#[test]
fn synthetic_series_is_reproducible() {
    let t0 = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let run = || {
        let mut rng = StdRng::seed_from_u64(99);
        simulate_series(&params(), t0, 1000, TimeDelta::minutes(10), &mut rng)
            .unwrap()
            .into_values()
    };
    assert_eq!(run(), run());
}

#[test]
fn synthetic_series_rejects_empty() {
    let t0 = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let err = simulate_series(&params(), t0, 0, TimeDelta::hours(1), &mut rng).unwrap_err();
    assert!(matches!(err, ModelError::InvalidDuration { .. }), "{err}");
}
