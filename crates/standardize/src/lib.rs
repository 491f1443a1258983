//! Standardization of raw ocean model output.
//!
//! # Pipeline Order
//!
//! 1. **Rename** to canonical names via a [`Renamer`]
//! 2. **Cell extent** (optional) recomputes z* thickness
//! 3. **Vertical** (optional) conservative regrid onto target depth bounds
//! 4. **Horizontal** (optional) conservative regrid onto a target grid
//! 5. **Wetmask** derived from a tracer, attached and applied
//! 6. **Provenance** attribute stamped with the configured revision
//! 7. **Shallow check** of the result against the schema

mod config;
mod error;
mod rename;
mod result;

pub use config::StandardizeConfig;
pub use error::StandardizeError;
pub use rename::{AliasRenamer, Renamer};
pub use result::{StandardizeResult, StepsApplied};

use oemu_dataset::Dataset;
use oemu_horizontal::spatially_regrid;
use oemu_mask::{apply_mask, derive_wetmask, land_fraction};
use oemu_validate::shallow_check;
use oemu_vertical::{infer_vertical_cell_extent, vertical_regrid_with};
use tracing::{debug, info};

/// Runs the standardization pipeline on `ds`.
///
/// `horizontal_target` is any dataset on the target grid carrying its cell
/// geometry; `None` skips horizontal regridding. Each other step is
/// controlled by [`StandardizeConfig`].
///
/// # Errors
///
/// Returns [`StandardizeError`] on invalid configuration or when any step
/// fails; nothing is retried.
#[tracing::instrument(skip_all, fields(renamer = renamer.name(), n_fields = ds.n_fields()))]
pub fn standardize_dataset(
    ds: &Dataset,
    horizontal_target: Option<&Dataset>,
    renamer: &dyn Renamer,
    config: &StandardizeConfig,
) -> Result<StandardizeResult, StandardizeError> {
    config.validate()?;
    let schema = config.schema();
    let mut steps = StepsApplied::default();

    // --- Step 1: Rename ---
    let mut out = renamer
        .rename(ds)
        .map_err(|source| StandardizeError::Rename {
            renamer: renamer.name().to_string(),
            source,
        })?;
    steps.renamed = true;
    debug!(step = "rename", "applied");

    // --- Step 2: Cell extent ---
    if config.infer_cell_extent() {
        out = infer_vertical_cell_extent(&out, config.vertical().thickness_coord())?;
        steps.cell_extent = true;
        debug!(step = "cell_extent", "applied");
    }

    // --- Step 3: Vertical ---
    if let Some(target) = config.vertical_target() {
        out = vertical_regrid_with(&out, target, config.vertical())?;
        steps.vertical = true;
        debug!(step = "vertical", "applied");
    }

    // --- Step 4: Horizontal ---
    if let Some(target) = horizontal_target {
        out = spatially_regrid(&out, target, config.horizontal())?;
        steps.horizontal = true;
        debug!(step = "horizontal", "applied");
    }

    // --- Step 5: Wetmask ---
    let mut fraction = None;
    if let Some(tracer) = config.wetmask_tracer() {
        let mask = derive_wetmask(&out, tracer, schema.time_dim())?;
        fraction = Some(land_fraction(&mask)?);
        out = apply_mask(&out, &mask)?;
        out.insert_coord(schema.wetmask(), mask.to_array())?;
        steps.wetmask = true;
        debug!(step = "wetmask", land_fraction = ?fraction, "applied");
    }

    // --- Step 6: Provenance ---
    out.set_attr(schema.provenance_attr(), config.revision());
    steps.provenance = true;

    // --- Step 7: Shallow check ---
    if config.shallow_check() {
        shallow_check(&out, schema)?;
        steps.shallow_check = true;
    }

    info!(?steps, n_fields = out.n_fields(), "standardization complete");
    Ok(StandardizeResult::new(out, steps, fraction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oemu_dataset::{DataArray, DatasetError};

    struct Failing;

    impl Renamer for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn rename(&self, _ds: &Dataset) -> Result<Dataset, DatasetError> {
            Err(DatasetError::MissingField { name: "so".into() })
        }
    }

    fn tiny() -> Dataset {
        let mut thetao = DataArray::filled(["time", "y", "x"], &[2, 2, 2], 4.0)
            .unwrap()
            .into_data();
        thetao[[0, 0, 0]] = f64::NAN;
        Dataset::new()
            .with_field("thetao", DataArray::new(["time", "y", "x"], thetao).unwrap())
            .unwrap()
            .with_field("zos", DataArray::filled(["time", "y", "x"], &[2, 2, 2], 0.1).unwrap())
            .unwrap()
    }

    #[test]
    fn minimal_pipeline_records_steps() {
        let config = StandardizeConfig::new().with_shallow_check(false).with_revision("test-rev");
        let result = standardize_dataset(&tiny(), None, &AliasRenamer::new(), &config).unwrap();
        let steps = result.steps();
        assert!(steps.renamed && steps.wetmask && steps.provenance);
        assert!(!steps.vertical && !steps.horizontal && !steps.cell_extent && !steps.shallow_check);

        let ds = result.dataset();
        assert_eq!(
            ds.attr(oemu_dataset::PROVENANCE_ATTR),
            Some("test-rev")
        );
        assert!(ds.coord("wetmask").is_some());
        // zos picks up the tracer's land point at every time step
        let zos = ds.require_field("zos").unwrap().array().data();
        assert!(zos[[0, 0, 0]].is_nan() && zos[[1, 0, 0]].is_nan());
        assert_eq!(result.land_fraction(), Some(0.25));
    }

    #[test]
    fn rename_failure_names_renamer() {
        let err = standardize_dataset(&tiny(), None, &Failing, &StandardizeConfig::new()).unwrap_err();
        assert!(matches!(err, StandardizeError::Rename { ref renamer, .. } if renamer == "failing"));
    }

    #[test]
    fn shallow_check_runs_on_output() {
        let err = standardize_dataset(&tiny(), None, &AliasRenamer::new(), &StandardizeConfig::new())
            .unwrap_err();
        assert!(matches!(err, StandardizeError::Validate(_)));
    }
}
