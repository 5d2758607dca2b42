//! Statistical and numerical helper functions for the Pluvio rainfall model.
//!
//! Moment helpers use population conventions (N denominator) throughout so
//! that empirical statistics line up with the analytic Bartlett-Lewis
//! moments. Quadrature is composite Gauss-Legendre on caller-chosen panels.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Population variance with N denominator.
/// Returns 0.0 if empty.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / nf
}

/// Lag-`k` autocovariance centred on the overall mean, divided by N.
///
/// Returns 0.0 if `k >= data.len()`.
pub fn autocovariance(data: &[f64], k: usize) -> f64 {
    let n = data.len();
    if k >= n {
        return 0.0;
    }
    let m = mean(data);
    data.iter()
        .zip(&data[k..])
        .map(|(&a, &b)| (a - m) * (b - m))
        .sum::<f64>()
        / n as f64
}

/// Fraction of values that are exactly zero. Returns 0.0 if empty.
pub fn zero_fraction(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().filter(|&&x| x == 0.0).count() as f64 / data.len() as f64
}

/// Non-overlapping block sums of `block` consecutive values.
///
/// A trailing incomplete block is dropped.
///
/// # Panics
///
/// Panics if `block` is zero.
pub fn block_sums(data: &[f64], block: usize) -> Vec<f64> {
    assert!(block > 0, "block_sums: block size must be positive");
    data.chunks_exact(block).map(|c| c.iter().sum()).collect()
}

/// Eight-point Gauss-Legendre abscissae on `[-1, 1]` (positive half).
const GL_NODES: [f64; 4] = [
    0.183_434_642_495_649_8,
    0.525_532_409_916_329,
    0.796_666_477_413_626_7,
    0.960_289_856_497_536_3,
];

/// Weights matching [`GL_NODES`].
const GL_WEIGHTS: [f64; 4] = [
    0.362_683_783_378_362,
    0.313_706_645_877_887_3,
    0.222_381_034_453_374_5,
    0.101_228_536_290_376_3,
];

/// Composite eight-point Gauss-Legendre quadrature of `f`.
///
/// `breaks` are the panel boundaries in increasing order; each panel
/// `[breaks[i], breaks[i + 1]]` is integrated separately and the results
/// summed. Fewer than two breakpoints integrate to zero.
pub fn gauss_legendre<F: FnMut(f64) -> f64>(breaks: &[f64], mut f: F) -> f64 {
    let mut total = 0.0;
    for panel in breaks.windows(2) {
        let half = 0.5 * (panel[1] - panel[0]);
        let mid = 0.5 * (panel[1] + panel[0]);
        let mut acc = 0.0;
        for (&x, &w) in GL_NODES.iter().zip(&GL_WEIGHTS) {
            acc += w * (f(mid - half * x) + f(mid + half * x));
        }
        total += half * acc;
    }
    total
}

/// Panel boundaries on `[0, end]` that start at width `first`, double in
/// width, and never exceed `max_width`.
///
/// Suited to integrands with a fast feature near zero and a slow tail.
/// Returns `[0.0]` when `end <= 0`.
pub fn geometric_breaks(end: f64, first: f64, max_width: f64) -> Vec<f64> {
    let mut breaks = vec![0.0];
    if end <= 0.0 {
        return breaks;
    }
    let mut x = 0.0;
    let mut width = first.min(max_width).max(f64::MIN_POSITIVE);
    while x < end {
        x = (x + width).min(end);
        breaks.push(x);
        width = (2.0 * width).min(max_width);
    }
    breaks
}
