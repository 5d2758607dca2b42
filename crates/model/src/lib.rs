//! # pluvio-model
//!
//! The Bartlett-Lewis rectangular pulse model of point rainfall.
//!
//! Storms arrive as a Poisson process of rate λ. Each storm lives for an
//! exponential time with rate γ, starts with one pulse at its origin and
//! generates further pulses at rate βγ while alive. Pulses last an
//! exponential time with rate η and carry an exponential intensity with
//! mean μ.
//!
//! ```text
//!  storm origin                    storm death (T ~ Exp(γ))
//!      |<------------------------------->|
//!      [=====]          [==]      [=========]      pulses, D ~ Exp(η)
//!          [==========]     [====]                 intensities X ~ Exp(1/μ)
//! ```
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`Parameters`] | validated parameter set with TOML/JSON documents |
//! | [`theory`] | analytic mean, variance, autocovariance, dry probability |
//! | [`simulate_storm`] | one storm rasterized to a grid |
//! | [`simulate_series`] | a long synthetic record |

mod error;
mod params;
mod storm;
mod synthetic;
pub mod theory;

pub use error::ModelError;
pub use params::{PARAMETER_NAMES, Parameters};
pub use storm::{Pulse, Storm, StormProfile, simulate_storm};
pub use synthetic::simulate_series;
pub use theory::ModelMoments;
