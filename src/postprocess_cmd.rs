//! Postprocess command: flat prediction NetCDF -> masked per-variable NetCDF.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use oemu_io::{ReaderConfig, read_netcdf, write_netcdf};
use oemu_postprocess::post_process_dataset;
use oemu_validate::prediction_check;

use crate::cli::PostprocessArgs;
use crate::config::OemuConfig;
use crate::convert;

/// Run the postprocessor on one prediction file.
pub fn run(args: PostprocessArgs) -> Result<()> {
    let _cmd = info_span!("postprocess").entered();
    let config = OemuConfig::load(&args.config)?;
    let schema = convert::build_schema(&config.schema)?;
    let writer_cfg = convert::build_writer_config(&config.io, args.overwrite)?;

    info!(path = %args.prediction.display(), "reading prediction");
    let raw = read_netcdf(
        &args.prediction,
        &ReaderConfig::default().with_variables([schema.layout().variable()]),
    )
    .with_context(|| format!("failed to read prediction: {}", args.prediction.display()))?;

    info!(path = %args.input.display(), "reading standardized input");
    let input = read_netcdf(&args.input, &convert::build_reader_config(&config.io))
        .with_context(|| format!("failed to read input: {}", args.input.display()))?;

    let out = post_process_dataset(&raw, &input, &schema).context("postprocessing failed")?;
    info!(n_fields = out.n_fields(), "prediction postprocessed");

    if args.check {
        prediction_check(&out, &input, &schema, true).context("postprocessed prediction failed validation")?;
        info!("prediction check passed");
    }

    info!(path = %args.output.display(), "writing postprocessed dataset");
    write_netcdf(&args.output, &out, &writer_cfg)
        .with_context(|| format!("failed to write NetCDF: {}", args.output.display()))?;
    Ok(())
}
