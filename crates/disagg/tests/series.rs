use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use pluvio_disagg::{
    DisaggConfig, DisaggError, FailurePolicy, disaggregate, disaggregate_series,
    disaggregate_series_par,
};
use pluvio_model::Parameters;
use pluvio_series::TimeSeries;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn params() -> Parameters {
    Parameters::new(0.02, 4.0, 0.1, 2.0, 1.5).unwrap()
}

/// Pulses so weak that every rasterized depth underflows to zero at a
/// one-second step.
fn vanishing_params() -> Parameters {
    Parameters::new(0.02, 2.0, 0.5, 2.0, 5e-324).unwrap()
}

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 7, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn hourly(values: Vec<f64>) -> TimeSeries {
    TimeSeries::new(t0(), TimeDelta::hours(1), values).unwrap()
}

fn assert_blocks_match(coarse: &TimeSeries, fine: &TimeSeries, k: usize) {
    assert_eq!(fine.len(), coarse.len() * k);
    for (block, &observed) in fine.values().chunks(k).zip(coarse.values()) {
        let sum: f64 = block.iter().sum();
        if observed == 0.0 {
            assert!(block.iter().all(|&v| v == 0.0));
        } else {
            assert_relative_eq!(sum, observed, max_relative = 1e-9);
        }
        assert!(block.iter().all(|&v| v >= 0.0));
    }
}

#[test]
fn series_blocks_sum_to_observed() {
    let coarse = hourly(vec![0.0, 5.0, 0.0, 2.5, 12.0, 0.1]);
    let mut rng = StdRng::seed_from_u64(8);
    let fine = disaggregate_series(
        &coarse,
        TimeDelta::minutes(10),
        &params(),
        &DisaggConfig::new(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(fine.start(), coarse.start());
    assert_eq!(fine.step(), TimeDelta::minutes(10));
    assert_blocks_match(&coarse, &fine, 6);
}

#[test]
fn same_seed_same_output() {
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        disaggregate(
            7.0,
            TimeDelta::hours(6),
            TimeDelta::minutes(10),
            &params(),
            &DisaggConfig::new(),
            &mut rng,
        )
        .unwrap()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn parallel_matches_itself_across_pools() {
    let coarse = hourly((0..48).map(|i| if i % 3 == 0 { 0.0 } else { i as f64 * 0.2 }).collect());
    let cfg = DisaggConfig::new();
    let run = || {
        disaggregate_series_par(&coarse, TimeDelta::minutes(10), &params(), &cfg, 1234).unwrap()
    };
    let default_pool = run();
    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(run);
    assert_eq!(default_pool, single);
    assert_blocks_match(&coarse, &default_pool, 6);

    let other_seed =
        disaggregate_series_par(&coarse, TimeDelta::minutes(10), &params(), &cfg, 4321).unwrap();
    assert_ne!(default_pool, other_seed);
}

#[test]
fn failure_aborts_by_default() {
    let coarse = hourly(vec![0.0, 3.0]);
    let mut rng = StdRng::seed_from_u64(0);
    let cfg = DisaggConfig::new().with_max_retries(5);
    let err = disaggregate_series(
        &coarse,
        TimeDelta::seconds(1),
        &vanishing_params(),
        &cfg,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(
        err,
        DisaggError::Failure {
            interval: 1,
            observed: 3.0,
            retries: 5
        }
    );
}

#[test]
fn failure_spreads_when_configured() {
    let coarse = hourly(vec![0.0, 3.0]);
    let cfg = DisaggConfig::new()
        .with_max_retries(5)
        .with_on_failure(FailurePolicy::SpreadUniformly);
    let fine = disaggregate_series_par(
        &coarse,
        TimeDelta::seconds(1),
        &vanishing_params(),
        &cfg,
        9,
    )
    .unwrap();
    assert_eq!(fine.len(), 7200);
    assert!(fine.values()[..3600].iter().all(|&v| v == 0.0));
    for &v in &fine.values()[3600..] {
        assert_relative_eq!(v, 3.0 / 3600.0, epsilon = 1e-15);
    }
}

#[test]
fn fine_step_must_divide_coarse_step() {
    let coarse = hourly(vec![1.0, 2.0]);
    let mut rng = StdRng::seed_from_u64(0);
    let err = disaggregate_series(
        &coarse,
        TimeDelta::minutes(25),
        &params(),
        &DisaggConfig::new(),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, DisaggError::Series(_)));
}
