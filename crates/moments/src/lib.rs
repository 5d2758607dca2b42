//! # pluvio-moments
//!
//! Empirical multi-scale moments of a rainfall series: the statistics the
//! Bartlett-Lewis calibrator fits.
//!
//! | Statistic | Definition (per scale, over `n` complete blocks) |
//! |-----------|--------------------------------------------------|
//! | mean | `Σ yᵢ / n` |
//! | variance | `Σ (yᵢ − ȳ)² / n` |
//! | lag-1 autocovariance | `Σ (yᵢ − ȳ)(yᵢ₊₁ − ȳ) / n` |
//! | dry probability | fraction of blocks with `yᵢ = 0` |
//!
//! Scales must be strictly increasing positive multiples of the series
//! step and leave at least two complete blocks each.

mod error;
mod estimate;
mod set;

pub use error::MomentError;
pub use estimate::{estimate_event_moments, estimate_moments};
pub use set::{MomentSet, ScaleMoments};
