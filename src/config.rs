use std::path::Path;

use anyhow::{Context, Result};
use pluvio_model::Parameters;
use serde::Deserialize;

/// Top-level Pluvio configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PluvioConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// File format settings.
    #[serde(default)]
    pub io: IoToml,

    /// Event extraction settings.
    #[serde(default)]
    pub events: EventsToml,

    /// Moment estimation settings.
    #[serde(default)]
    pub moments: MomentsToml,

    /// Calibration settings.
    #[serde(default)]
    pub calibration: CalibrationToml,

    /// Disaggregation settings.
    #[serde(default)]
    pub disaggregation: DisaggregationToml,
}

impl PluvioConfig {
    /// Reads the configuration at `path`, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_days")]
    pub row_group_days: u32,
    #[serde(default)]
    pub fill_gaps: bool,
    #[serde(default)]
    pub step_minutes: Option<i64>,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            row_group_days: default_row_group_days(),
            fill_gaps: false,
            step_minutes: None,
        }
    }
}

fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_days() -> u32 {
    365
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsToml {
    #[serde(default = "default_inter_event_gap")]
    pub inter_event_gap_minutes: i64,
    #[serde(default = "default_intra_event_gap")]
    pub intra_event_gap_minutes: i64,
    #[serde(default)]
    pub wet_threshold: f64,
    #[serde(default)]
    pub assume_dry_before_start: bool,
}

impl Default for EventsToml {
    fn default() -> Self {
        Self {
            inter_event_gap_minutes: default_inter_event_gap(),
            intra_event_gap_minutes: default_intra_event_gap(),
            wet_threshold: 0.0,
            assume_dry_before_start: false,
        }
    }
}

fn default_inter_event_gap() -> i64 {
    30
}
fn default_intra_event_gap() -> i64 {
    15
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MomentsToml {
    #[serde(default = "default_scales")]
    pub scales_minutes: Vec<i64>,
}

impl Default for MomentsToml {
    fn default() -> Self {
        Self {
            scales_minutes: default_scales(),
        }
    }
}

fn default_scales() -> Vec<i64> {
    vec![60, 180, 360, 1440]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationToml {
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    #[serde(default = "default_max_restarts")]
    pub max_restarts: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub weights: WeightsToml,
    /// Optional starting point; the heuristic guess is used otherwise.
    #[serde(default)]
    pub initial: Option<Parameters>,
}

impl Default for CalibrationToml {
    fn default() -> Self {
        Self {
            max_iters: default_max_iters(),
            max_restarts: default_max_restarts(),
            tolerance: default_tolerance(),
            weights: WeightsToml::default(),
            initial: None,
        }
    }
}

fn default_max_iters() -> u64 {
    2000
}
fn default_max_restarts() -> usize {
    8
}
fn default_tolerance() -> f64 {
    1e-6
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightsToml {
    #[serde(default = "default_weight")]
    pub mean: f64,
    #[serde(default = "default_weight")]
    pub variance: f64,
    #[serde(default = "default_weight")]
    pub lag1_autocovariance: f64,
    #[serde(default = "default_weight")]
    pub dry_probability: f64,
}

impl Default for WeightsToml {
    fn default() -> Self {
        Self {
            mean: default_weight(),
            variance: default_weight(),
            lag1_autocovariance: default_weight(),
            dry_probability: default_weight(),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisaggregationToml {
    #[serde(default = "default_fine_step")]
    pub fine_step_minutes: i64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_on_failure")]
    pub on_failure: String,
}

impl Default for DisaggregationToml {
    fn default() -> Self {
        Self {
            fine_step_minutes: default_fine_step(),
            max_retries: default_max_retries(),
            on_failure: default_on_failure(),
        }
    }
}

fn default_fine_step() -> i64 {
    10
}
fn default_max_retries() -> usize {
    100
}
fn default_on_failure() -> String {
    "abort".to_string()
}
