mod cli;
mod config;
mod convert;
mod logging;
mod postprocess_cmd;
mod standardize_cmd;
mod validate_cmd;

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
        Command::Standardize(args) => standardize_cmd::run(args),
        Command::Postprocess(args) => postprocess_cmd::run(args),
        Command::Validate(args) => validate_cmd::run(args),
    }
}
