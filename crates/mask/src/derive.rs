//! Deriving a wetmask from data and summarizing it.

use oemu_dataset::{Dataset, Mask, dims};

use crate::error::MaskError;

/// Wetmask from the non-missing cells of `tracer` at the first time step.
///
/// A tracer without a time dimension is used as is.
pub fn derive_wetmask(ds: &Dataset, tracer: &str, time_dim: &str) -> Result<Mask, MaskError> {
    let array = ds.require_field(tracer)?.array();
    let snapshot = if array.has_dim(time_dim) {
        array.isel(time_dim, 0)?
    } else {
        array.clone()
    };
    Ok(snapshot.notnull())
}

/// Fraction of dry cells at the top depth level of `mask`.
pub fn land_fraction(mask: &Mask) -> Result<f64, MaskError> {
    let top = if mask.has_dim(dims::LEV) {
        mask.isel(dims::LEV, 0)?
    } else {
        mask.clone()
    };
    if top.is_empty() {
        return Err(MaskError::EmptyMask);
    }
    Ok(top.count_dry() as f64 / top.len() as f64)
}
