//! Structural checks that never touch data values.

use std::collections::BTreeSet;

use oemu_dataset::{Dataset, Schema};
use tracing::debug;

use crate::error::ValidateError;

fn difference(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Vec<String> {
    a.difference(b).cloned().collect()
}

/// Check `ds` against the structural expectations of `schema`.
///
/// In order: the exact coordinate set, the fixed dimension sizes, the
/// provenance attribute, the dimension set of each listed coordinate, and
/// (if the schema names them) the exact data-variable set. The first
/// violation is returned.
#[tracing::instrument(skip_all)]
pub fn shallow_check(ds: &Dataset, schema: &Schema) -> Result<(), ValidateError> {
    let coords = ds.coord_names();
    if &coords != schema.coords() {
        return Err(ValidateError::UnexpectedCoordinates {
            expected: schema.coords().iter().cloned().collect(),
            missing: difference(schema.coords(), &coords),
            unexpected: difference(&coords, schema.coords()),
        });
    }

    let sizes = ds.sizes();
    for (dim, &expected) in schema.sizes() {
        let Some(&got) = sizes.get(dim) else {
            return Err(ValidateError::MissingDimension { dim: dim.clone() });
        };
        if got != expected {
            return Err(ValidateError::DimensionSize {
                dim: dim.clone(),
                expected,
                got,
            });
        }
    }

    if ds.attr(schema.provenance_attr()).is_none() {
        return Err(ValidateError::MissingAttribute {
            key: schema.provenance_attr().to_string(),
        });
    }

    for (coord, expected) in schema.coord_dims() {
        let got: BTreeSet<String> = ds.require_coord(coord)?.dims().iter().cloned().collect();
        if &got != expected {
            return Err(ValidateError::CoordinateDims {
                coord: coord.clone(),
                expected: expected.iter().cloned().collect(),
                got: got.into_iter().collect(),
            });
        }
    }

    if let Some(expected) = schema.data_vars() {
        let names = ds.field_names();
        if &names != expected {
            return Err(ValidateError::MissingVariables {
                missing: difference(expected, &names),
                unexpected: difference(&names, expected),
            });
        }
    }

    debug!(n_fields = ds.n_fields(), "shallow check passed");
    Ok(())
}
