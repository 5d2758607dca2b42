//! # pluvio-calibrate
//!
//! Fits Bartlett-Lewis parameters by matching analytic aggregated moments
//! to empirical ones.
//!
//! ```text
//! fine series ──extract_events──▶ events ──estimate_event_moments──▶ MomentSet
//!                                   │                                   │
//!                           summarize_events                        calibrate
//!                                   │                                   │
//!                           guess_from_events ──── initial guess ───────┘
//!                                                                       ▼
//!                                                              CalibrationResult
//! ```
//!
//! The optimizer is `argmin`'s Nelder-Mead over log-parameters, restarted
//! from its best point until the relative improvement drops below the
//! configured tolerance.

mod calibrate;
mod config;
mod error;
mod guess;
mod objective;
mod optimizer;
mod pipeline;

pub use calibrate::{CalibrationResult, calibrate};
pub use config::{CalibrationConfig, MomentWeights};
pub use error::CalibrationError;
pub use guess::{guess_from_events, guess_from_moments};
pub use pipeline::calibrate_series;
