//! Validation of postprocessed model predictions.

use std::collections::BTreeSet;

use oemu_dataset::{Dataset, Schema};
use oemu_mask::assert_mask_match;
use tracing::{debug, info};

use crate::deep::deep_check;
use crate::error::ValidateError;

fn check_sizes(pred: &Dataset, schema: &Schema) -> Result<(), ValidateError> {
    let sizes = pred.sizes();
    let dims: BTreeSet<&String> = sizes
        .keys()
        .chain(schema.sizes().keys())
        .filter(|d| d.as_str() != schema.time_dim())
        .collect();
    for dim in dims {
        match (schema.size_of(dim), sizes.get(dim)) {
            (Some(expected), Some(&got)) if expected != got => {
                return Err(ValidateError::DimensionSize {
                    dim: dim.clone(),
                    expected,
                    got,
                });
            }
            (Some(_), None) => return Err(ValidateError::MissingDimension { dim: dim.clone() }),
            (None, Some(&size)) => {
                return Err(ValidateError::UnexpectedDimension {
                    dim: dim.clone(),
                    size,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validate a postprocessed prediction against the `input` it was made from.
///
/// Requires the schema's fixed sizes (any time length), no dimensions
/// without coordinates apart from time, attributes identical to the
/// input's, and a missing-value pattern at the first time step equal to the
/// input wetmask. With `deep` the [`deep_check`] runs as well.
#[tracing::instrument(skip_all, fields(deep = deep))]
pub fn prediction_check(
    pred: &Dataset,
    input: &Dataset,
    schema: &Schema,
    deep: bool,
) -> Result<(), ValidateError> {
    check_sizes(pred, schema)?;

    let dangling: Vec<String> = pred
        .dims_without_coords()
        .into_iter()
        .filter(|d| d != schema.time_dim())
        .collect();
    if !dangling.is_empty() {
        return Err(ValidateError::DanglingDimensions { dims: dangling });
    }

    if pred.attrs() != input.attrs() {
        let keys: BTreeSet<String> = pred
            .attrs()
            .keys()
            .chain(input.attrs().keys())
            .filter(|k| pred.attr(k) != input.attr(k))
            .cloned()
            .collect();
        return Err(ValidateError::AttributeMismatch {
            keys: keys.into_iter().collect(),
        });
    }

    let wetmask = input.wetmask(schema.wetmask())?;
    let first = if pred.sizes().contains_key(schema.time_dim()) {
        pred.isel(schema.time_dim(), 0)?
    } else {
        pred.clone()
    };
    assert_mask_match(&first, &wetmask).map_err(ValidateError::MaskMismatch)?;
    debug!("prediction matches input wetmask");

    if deep {
        deep_check(pred, schema)?;
    }
    info!(n_fields = pred.n_fields(), "prediction passed validation");
    Ok(())
}
