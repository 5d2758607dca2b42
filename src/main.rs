mod calibrate_cmd;
mod cli;
mod config;
mod convert;
mod disaggregate_cmd;
mod logging;
mod simulate_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Calibrate(args) => calibrate_cmd::run(args),
        Command::Disaggregate(args) => disaggregate_cmd::run(args),
        Command::Simulate(args) => simulate_cmd::run(args),
    }
}
