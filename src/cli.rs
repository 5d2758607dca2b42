use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pluvio Bartlett-Lewis rainfall model.
#[derive(Parser)]
#[command(
    name = "pluvio",
    version,
    about = "Bartlett-Lewis rainfall calibration and temporal disaggregation"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Fit model parameters to a fine-resolution series.
    Calibrate(CalibrateArgs),
    /// Downscale a coarse series to a finer step.
    Disaggregate(DisaggregateArgs),
    /// Generate a synthetic series from model parameters.
    Simulate(SimulateArgs),
}

/// Arguments for the `calibrate` subcommand.
#[derive(clap::Args)]
pub struct CalibrateArgs {
    /// Path to the fine-resolution input Parquet file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path for the fitted parameters (.toml or .json); printed if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `disaggregate` subcommand.
#[derive(clap::Args)]
pub struct DisaggregateArgs {
    /// Path to the coarse input Parquet file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to the parameter file (.toml or .json).
    #[arg(short, long)]
    pub params: PathBuf,

    /// Path for the fine-resolution output Parquet file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the fine step from config, in minutes.
    #[arg(long = "fine-step-minutes")]
    pub fine_step_minutes: Option<i64>,

    /// Step of the coarse input in minutes; read from the file if omitted.
    #[arg(long = "coarse-step-minutes")]
    pub coarse_step_minutes: Option<i64>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Disaggregate intervals in parallel.
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Path to the parameter file (.toml or .json).
    #[arg(short, long)]
    pub params: PathBuf,

    /// Path for the synthetic output Parquet file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Length of the synthetic record in days.
    #[arg(long, default_value_t = 365)]
    pub days: u32,

    /// Sampling step in minutes; must divide one day.
    #[arg(long = "step-minutes", default_value_t = 60)]
    pub step_minutes: i64,

    /// First timestamp of the record (YYYY-MM-DD, midnight UTC).
    #[arg(long, default_value = "2000-01-01")]
    pub start: String,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}
