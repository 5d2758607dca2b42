//! Model parameters and their TOML/JSON document form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Bartlett-Lewis parameters.
///
/// Model time is in hours.
///
/// | Field | Meaning | Unit |
/// |-------|---------|------|
/// | `lambda` | storm arrival rate | 1/h |
/// | `beta` | mean pulses generated after the origin pulse | - |
/// | `gamma` | storm termination rate | 1/h |
/// | `eta` | pulse termination rate | 1/h |
/// | `mu` | mean pulse intensity | mm/h |
///
/// Every value is finite and strictly positive; deserialization goes
/// through the same validation as [`Parameters::new`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterDocument", into = "ParameterDocument")]
pub struct Parameters {
    lambda: f64,
    beta: f64,
    gamma: f64,
    eta: f64,
    mu: f64,
}

/// Document keys in storage order.
pub const PARAMETER_NAMES: [&str; 5] = ["lambda", "beta", "gamma", "eta", "mu"];

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterDocument {
    lambda: f64,
    beta: f64,
    gamma: f64,
    eta: f64,
    mu: f64,
}

impl TryFrom<ParameterDocument> for Parameters {
    type Error = ModelError;

    fn try_from(doc: ParameterDocument) -> Result<Self, Self::Error> {
        Parameters::new(doc.lambda, doc.beta, doc.gamma, doc.eta, doc.mu)
    }
}

impl From<Parameters> for ParameterDocument {
    fn from(p: Parameters) -> Self {
        Self {
            lambda: p.lambda,
            beta: p.beta,
            gamma: p.gamma,
            eta: p.eta,
            mu: p.mu,
        }
    }
}

impl Parameters {
    /// Creates a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidParameter`] for the first value that is
    /// non-finite or not strictly positive.
    pub fn new(lambda: f64, beta: f64, gamma: f64, eta: f64, mu: f64) -> Result<Self, ModelError> {
        let values = [lambda, beta, gamma, eta, mu];
        for (&name, &value) in PARAMETER_NAMES.iter().zip(&values) {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidParameter { name, value });
            }
        }
        Ok(Self {
            lambda,
            beta,
            gamma,
            eta,
            mu,
        })
    }

    /// Builds parameters from natural logarithms in [`PARAMETER_NAMES`] order.
    pub fn from_log(logs: &[f64; 5]) -> Result<Self, ModelError> {
        Self::new(
            logs[0].exp(),
            logs[1].exp(),
            logs[2].exp(),
            logs[3].exp(),
            logs[4].exp(),
        )
    }

    /// Returns the natural logarithms in [`PARAMETER_NAMES`] order.
    pub fn to_log(&self) -> [f64; 5] {
        self.to_array().map(f64::ln)
    }

    /// Returns the values in [`PARAMETER_NAMES`] order.
    pub fn to_array(&self) -> [f64; 5] {
        [self.lambda, self.beta, self.gamma, self.eta, self.mu]
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Mean number of pulses per storm, origin pulse included.
    pub fn mean_pulses_per_storm(&self) -> f64 {
        1.0 + self.beta
    }

    /// Arrival rate of pulses within a live storm (1/h).
    pub fn pulse_arrival_rate(&self) -> f64 {
        self.beta * self.gamma
    }

    /// Serializes to a TOML document.
    pub fn to_toml(&self) -> Result<String, ModelError> {
        toml::to_string(self).map_err(|e| ModelError::Document {
            format: "TOML",
            reason: e.to_string(),
        })
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ModelError> {
        toml::from_str(text).map_err(|e| ModelError::Document {
            format: "TOML",
            reason: e.message().to_string(),
        })
    }

    /// Serializes to a pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::Document {
            format: "JSON",
            reason: e.to_string(),
        })
    }

    /// Parses and validates a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        serde_json::from_str(text).map_err(|e| ModelError::Document {
            format: "JSON",
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lambda={:.6} beta={:.6} gamma={:.6} eta={:.6} mu={:.6}",
            self.lambda, self.beta, self.gamma, self.eta, self.mu
        )
    }
}
