use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ocean emulator data standardization and postprocessing.
#[derive(Parser)]
#[command(
    name = "oemu",
    version,
    about = "Standardize ocean model output and postprocess emulator predictions"
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
    /// Rename, regrid and mask raw model output onto the canonical grid.
    Standardize(StandardizeArgs),
    /// Convert a flat emulator prediction back into a masked dataset.
    Postprocess(PostprocessArgs),
    /// Check a standardized dataset (and optionally a prediction) against the schema.
    Validate(ValidateArgs),
}

/// Arguments for the `standardize` subcommand.
#[derive(clap::Args)]
pub struct StandardizeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "oemu.toml")]
    pub config: PathBuf,

    /// Raw model output NetCDF file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// NetCDF file defining the target horizontal grid (skip horizontal regridding if absent).
    #[arg(short, long)]
    pub target_grid: Option<PathBuf>,

    /// Path for the standardized NetCDF output.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Replace the output file if it exists.
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the `postprocess` subcommand.
#[derive(clap::Args)]
pub struct PostprocessArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "oemu.toml")]
    pub config: PathBuf,

    /// Raw prediction NetCDF file holding the flat channel variable.
    #[arg(short, long)]
    pub prediction: PathBuf,

    /// Standardized input dataset the prediction was made from.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the postprocessed NetCDF output.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Replace the output file if it exists.
    #[arg(long)]
    pub overwrite: bool,

    /// Run the prediction check (with the deep check) on the result.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the `validate` subcommand.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "oemu.toml")]
    pub config: PathBuf,

    /// Standardized dataset to check.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Postprocessed prediction to check against the input.
    #[arg(short, long)]
    pub prediction: Option<PathBuf>,

    /// Also run the (expensive) missing-value consistency check.
    #[arg(long)]
    pub deep: bool,

    /// Write a JSON report here instead of printing it.
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}
