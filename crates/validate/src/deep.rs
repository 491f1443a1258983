//! Missing-value consistency across variables and time.

use std::collections::BTreeSet;

use oemu_dataset::{DataArray, Dataset, FieldKind, Mask, Schema};
use tracing::debug;

use crate::error::ValidateError;

/// Non-missing pattern of `array` at time step `t` (or overall without a time dim).
fn pattern_at(array: &DataArray, time_dim: &str, t: usize) -> Result<Mask, ValidateError> {
    let a = if array.has_dim(time_dim) {
        array.isel(time_dim, t)?
    } else {
        array.clone()
    };
    Ok(a.notnull())
}

fn same_pattern(a: &Mask, b: &Mask) -> Result<bool, ValidateError> {
    if a.dims().len() != b.dims().len() {
        return Ok(false);
    }
    let b = b.transpose(a.dims())?;
    Ok(a.data() == b.data())
}

fn check_kind(ds: &Dataset, kind: FieldKind, time_dim: &str) -> Result<(), ValidateError> {
    let fields: Vec<(&String, &DataArray)> = ds
        .fields_of_kind(kind)
        .map(|(n, f)| (n, f.array()))
        .collect();
    let Some(&(reference, ref_array)) = fields.first() else {
        return Ok(());
    };

    let ref_pattern = pattern_at(ref_array, time_dim, 0)?;
    let mut variables = Vec::new();
    let mut indices = Vec::new();
    for (idx, (name, array)) in fields.iter().enumerate().skip(1) {
        if !same_pattern(&ref_pattern, &pattern_at(array, time_dim, 0)?)? {
            variables.push((*name).clone());
            indices.push(idx);
        }
    }
    if !indices.is_empty() {
        return Err(ValidateError::InconsistentVariables {
            kind,
            reference: reference.clone(),
            variables,
            indices,
        });
    }

    for (name, array) in &fields {
        let n_time = array.len_of(time_dim).unwrap_or(1);
        let first = pattern_at(array, time_dim, 0)?;
        let mut changed = BTreeSet::new();
        for t in 1..n_time {
            if !same_pattern(&first, &pattern_at(array, time_dim, t)?)? {
                changed.insert(t);
            }
        }
        if !changed.is_empty() {
            return Err(ValidateError::InconsistentTimeSteps {
                kind,
                variable: (*name).clone(),
                indices: changed.into_iter().collect(),
            });
        }
    }
    debug!(%kind, n_fields = fields.len(), "missing values consistent");
    Ok(())
}

/// Check that surface and volumetric fields each share one missing-value
/// pattern.
///
/// For each kind independently, every field's pattern at the first time
/// step must equal that of the first field in name order, and every later
/// time step must repeat the first. Fields without a time dimension are a
/// single time step.
#[tracing::instrument(skip_all, fields(n_fields = ds.n_fields()))]
pub fn deep_check(ds: &Dataset, schema: &Schema) -> Result<(), ValidateError> {
    for kind in [FieldKind::Surface, FieldKind::Volumetric] {
        check_kind(ds, kind, schema.time_dim())?;
    }
    Ok(())
}
