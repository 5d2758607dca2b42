//! # pluvio-disagg
//!
//! Temporal disaggregation of coarse rainfall with simulated
//! Bartlett-Lewis storms.
//!
//! ```text
//! observed 12.0 mm in [00:00, 01:00)
//!        │  simulate storm (capped at 1 h) ─▶ [0.4, 1.1, 0.2]
//!        │  place at random offset         ─▶ [0, 0, 0.4, 1.1, 0.2, 0]
//!        ▼  rescale to 12.0                ─▶ [0, 0, 2.82, 7.76, 1.41, 0]
//! ```
//!
//! | Function | Randomness |
//! |----------|------------|
//! | [`disaggregate`] | caller's generator, one interval |
//! | [`disaggregate_series`] | caller's generator, intervals in order |
//! | [`disaggregate_series_par`] | one `StdRng` per interval, seeded from `(seed, index)` |

mod config;
mod disaggregate;
mod error;

pub use config::{DisaggConfig, FailurePolicy};
pub use disaggregate::{disaggregate, disaggregate_series, disaggregate_series_par};
pub use error::DisaggError;
