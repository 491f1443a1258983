//! Re-layering a dataset onto target depth bounds.

use oemu_dataset::{Dataset, DepthBounds, Field};
use tracing::{debug, info, warn};

use crate::config::VerticalConfig;
use crate::error::VerticalError;
use crate::remap::{ConservativeTransform, VerticalTransform, remap_along};

/// Regrid every volumetric field onto `target` with the default names.
pub fn vertical_regrid(ds: &Dataset, target: &DepthBounds) -> Result<Dataset, VerticalError> {
    vertical_regrid_with(ds, target, &VerticalConfig::default())
}

/// Regrid every volumetric field of `ds` onto `target` depth bounds.
///
/// Each volumetric field is multiplied by the source thickness coordinate,
/// remapped conservatively using the source cell bounds, and divided by the
/// target thickness. Surface fields pass through unchanged. The output's
/// depth coordinate holds the target cell centers and its thickness
/// coordinate the target thicknesses; every coordinate without the depth
/// dimension is kept, and attributes are copied verbatim.
///
/// Target cells outside the source depth range have no source overlap and
/// become `NaN`; a warning reports how many there are.
///
/// # Errors
///
/// [`VerticalError::MissingInputs`] if the dataset has volumetric fields but
/// lacks the bounds or thickness variables (only the absent names are
/// listed).
#[tracing::instrument(skip_all, fields(n_fields = ds.n_fields(), n_target = target.n_cells()))]
pub fn vertical_regrid_with(
    ds: &Dataset,
    target: &DepthBounds,
    config: &VerticalConfig,
) -> Result<Dataset, VerticalError> {
    config.validate()?;
    let lev = config.lev_dim();

    let volumetric: Vec<(&String, &Field)> = ds
        .fields()
        .filter(|(_, f)| f.array().has_dim(lev))
        .collect();
    if volumetric.is_empty() {
        debug!("no volumetric fields, nothing to regrid");
        return Ok(ds.clone());
    }

    let (Some(bounds), Some(thickness)) = (
        ds.variable(config.bounds_coord()),
        ds.variable(config.thickness_coord()),
    ) else {
        let missing = [config.bounds_coord(), config.thickness_coord()]
            .into_iter()
            .filter(|name| ds.variable(name).is_none())
            .map(str::to_string)
            .collect();
        return Err(VerticalError::MissingInputs {
            missing,
            purpose: "reconstruct vertical cell bounds".to_string(),
        });
    };

    let source = DepthBounds::from_cell_bounds(bounds, lev, config.bounds_dim())?;
    let transform = ConservativeTransform::new(&source, target);
    debug!(
        n_source = transform.n_source(),
        n_target = transform.n_target(),
        source_top = source.top(),
        source_bottom = source.bottom(),
        "built conservative transform"
    );

    let uncovered = transform.uncovered();
    if !uncovered.is_empty() {
        warn!(
            count = uncovered.len(),
            cells = ?uncovered,
            "target depth cells lie outside the source depth range and are set to NaN"
        );
    }

    let target_dz = target.thickness_array(lev);
    let mut out = Dataset::new();
    for (name, coord) in ds.coords() {
        if !coord.has_dim(lev) {
            out.insert_coord(name.clone(), coord.clone())?;
        }
    }
    out.insert_coord(lev, target.centers_array(lev))?;
    out.insert_coord(config.thickness_coord(), target_dz.clone())?;

    for (name, field) in ds.fields() {
        let array = field.array();
        if !array.has_dim(lev) {
            out.insert_field(name.clone(), array.clone())?;
            continue;
        }
        let extensive = array.mul(thickness)?;
        let remapped = remap_along(&extensive, lev, &transform)?;
        let intensive = remapped.div(&target_dz)?;
        debug!(variable = %name, "regridded");
        out.insert_field(name.clone(), intensive)?;
    }

    out.set_attrs(ds.attrs().clone());
    info!(
        n_volumetric = volumetric.len(),
        n_levels = target.n_cells(),
        "vertical regrid complete"
    );
    Ok(out)
}
