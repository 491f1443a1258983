//! Standardize command: raw model output NetCDF -> canonical NetCDF.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use oemu_io::{read_netcdf, write_netcdf};
use oemu_standardize::standardize_dataset;

use crate::cli::StandardizeArgs;
use crate::config::OemuConfig;
use crate::convert;

/// Run the standardization pipeline on one file.
pub fn run(args: StandardizeArgs) -> Result<()> {
    let _cmd = info_span!("standardize").entered();
    // 1. Load project TOML and build every config up front
    let config = OemuConfig::load(&args.config)?;
    let pipeline_cfg = convert::build_standardize_config(&config)?;
    let renamer = convert::build_renamer(&config.standardize)?;
    let reader_cfg = convert::build_reader_config(&config.io);
    let writer_cfg = convert::build_writer_config(&config.io, args.overwrite)?;

    // 2. Read raw output and the optional target grid
    info!(path = %args.input.display(), "reading raw model output");
    let raw = read_netcdf(&args.input, &reader_cfg)
        .with_context(|| format!("failed to read NetCDF: {}", args.input.display()))?;
    let target = args
        .target_grid
        .as_ref()
        .map(|path| {
            info!(path = %path.display(), "reading target grid");
            read_netcdf(path, &reader_cfg)
                .with_context(|| format!("failed to read target grid: {}", path.display()))
        })
        .transpose()?;

    // 3. Standardize
    let result = standardize_dataset(&raw, target.as_ref(), &renamer, &pipeline_cfg)
        .with_context(|| format!("failed to standardize {}", args.input.display()))?;
    info!(
        steps = ?result.steps(),
        land_fraction = ?result.land_fraction(),
        "standardization finished"
    );

    // 4. Write
    info!(path = %args.output.display(), "writing standardized dataset");
    write_netcdf(&args.output, result.dataset(), &writer_cfg)
        .with_context(|| format!("failed to write NetCDF: {}", args.output.display()))?;
    Ok(())
}
