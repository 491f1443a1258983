//! Validate command: schema and consistency checks with a JSON report.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use oemu_io::{ValidationReport, read_netcdf};
use oemu_validate::{deep_check, prediction_check, shallow_check};

use crate::cli::ValidateArgs;
use crate::config::OemuConfig;
use crate::convert;

/// Run the validators and emit a report.
pub fn run(args: ValidateArgs) -> Result<()> {
    let _cmd = info_span!("validate").entered();
    let config = OemuConfig::load(&args.config)?;
    let schema = convert::build_schema(&config.schema)?;
    let reader_cfg = convert::build_reader_config(&config.io);

    info!(path = %args.input.display(), "reading dataset");
    let input = read_netcdf(&args.input, &reader_cfg)
        .with_context(|| format!("failed to read NetCDF: {}", args.input.display()))?;

    let report = match &args.prediction {
        None => {
            let outcome = shallow_check(&input, &schema).and_then(|()| {
                if args.deep { deep_check(&input, &schema) } else { Ok(()) }
            });
            let check = if args.deep { "deep" } else { "shallow" };
            ValidationReport::from_outcome(check, &input, &schema, &outcome)
        }
        Some(path) => {
            info!(path = %path.display(), "reading prediction");
            let prediction = read_netcdf(path, &reader_cfg)
                .with_context(|| format!("failed to read prediction: {}", path.display()))?;
            let outcome = prediction_check(&prediction, &input, &schema, args.deep);
            ValidationReport::from_outcome("prediction", &prediction, &schema, &outcome)
        }
    };

    match &args.report {
        Some(path) => report
            .write_json(path)
            .with_context(|| format!("failed to write report: {}", path.display()))?,
        None => println!("{}", report.to_json()?),
    }

    if !report.passed {
        bail!(
            "{} check failed: {}",
            report.check,
            report.message.as_deref().unwrap_or("no details")
        );
    }
    info!(check = %report.check, "validation passed");
    Ok(())
}
