//! Applying and checking a wetmask across a dataset.

use ndarray::Zip;
use oemu_dataset::{DataArray, Dataset, Mask};
use tracing::debug;

use crate::error::MaskError;
use crate::reduce::{MaskReduction, reduce_mask};

/// Set every field to `NaN` wherever `mask` is false.
///
/// The mask is reduced onto each field's own dimensions with
/// [`MaskReduction::FirstIndex`] and broadcast over the rest, so a 3-D
/// `(x, y, lev)` mask masks surface fields with its top level. Coordinates
/// and attributes are carried over unchanged.
pub fn apply_mask(ds: &Dataset, mask: &Mask) -> Result<Dataset, MaskError> {
    apply_mask_with(ds, mask, MaskReduction::default())
}

/// [`apply_mask`] with an explicit reduction policy.
#[tracing::instrument(skip_all, fields(n_fields = ds.n_fields(), reduction = ?reduction))]
pub fn apply_mask_with(
    ds: &Dataset,
    mask: &Mask,
    reduction: MaskReduction,
) -> Result<Dataset, MaskError> {
    let out = ds.map_fields(|name, field| {
        let array = field.array();
        let reduced = reduce_mask(mask, array.dims(), reduction)?;
        let masked = array.where_mask(&reduced)?;
        debug!(variable = name, dims = ?reduced.dims(), "masked");
        Ok::<DataArray, MaskError>(masked)
    })?;
    Ok(out)
}

/// Require every field's non-missing pattern to equal `mask`.
///
/// The mask is reduced as in [`apply_mask`] and compared at every index of
/// the field's remaining dimensions (e.g. every time step). Fields are
/// checked in name order; the first mismatch is returned.
pub fn assert_mask_match(ds: &Dataset, mask: &Mask) -> Result<(), MaskError> {
    assert_mask_match_with(ds, mask, MaskReduction::default())
}

/// [`assert_mask_match`] with an explicit reduction policy.
pub fn assert_mask_match_with(
    ds: &Dataset,
    mask: &Mask,
    reduction: MaskReduction,
) -> Result<(), MaskError> {
    for (name, field) in ds.fields() {
        let array = field.array();
        let reduced = reduce_mask(mask, array.dims(), reduction)?;
        let expected = reduced.align_to(array.dims(), array.shape())?;
        let mismatched = Zip::from(array.data())
            .and(&expected)
            .fold(0usize, |acc, &v, &wet| acc + usize::from(v.is_nan() == wet));
        if mismatched > 0 {
            return Err(MaskError::Mismatch {
                variable: name.clone(),
                mismatched,
                total: array.data().len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn wetmask() -> Mask {
        // dims (lev, x); cell (lev=1, x=0) is seafloor
        let data =
            ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![true, true, false, false, true, true])
                .unwrap();
        Mask::new(["lev", "x"], data).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::new()
            .with_field("so", DataArray::filled(["time", "lev", "x"], &[2, 2, 3], 35.0).unwrap())
            .unwrap()
            .with_field("zos", DataArray::filled(["time", "x"], &[2, 3], 0.1).unwrap())
            .unwrap()
            .with_coord("x", DataArray::from_vec("x", vec![0.0, 1.0, 2.0]))
            .unwrap()
            .with_attr("source", "test")
    }

    #[test]
    fn apply_mask_sets_dry_cells_to_nan() {
        let out = apply_mask(&dataset(), &wetmask()).unwrap();
        let so = out.require_field("so").unwrap().array();
        assert!(so.data()[[0, 0, 2]].is_nan());
        assert!(so.data()[[1, 1, 0]].is_nan());
        assert!(!so.data()[[1, 1, 2]].is_nan());
        assert_eq!(so.count_missing(), 2 * 2);

        // surface uses the top level
        let zos = out.require_field("zos").unwrap().array();
        assert_eq!(zos.count_missing(), 2);
        assert!(zos.data()[[0, 2]].is_nan());
    }

    #[test]
    fn apply_mask_preserves_structure() {
        let ds = dataset();
        let out = apply_mask(&ds, &wetmask()).unwrap();
        assert_eq!(out.field_names(), ds.field_names());
        assert_eq!(out.coord_names(), ds.coord_names());
        assert_eq!(out.attrs(), ds.attrs());
        for (name, field) in ds.fields() {
            let masked = out.require_field(name).unwrap();
            assert_eq!(masked.kind(), field.kind());
            assert_eq!(masked.array().dims(), field.array().dims());
            assert_eq!(masked.array().shape(), field.array().shape());
        }
    }

    #[test]
    fn masked_dataset_matches_its_mask() {
        let out = apply_mask(&dataset(), &wetmask()).unwrap();
        assert!(assert_mask_match(&out, &wetmask()).is_ok());
    }

    #[test]
    fn unmasked_dataset_fails_first_field() {
        let err = assert_mask_match(&dataset(), &wetmask()).unwrap_err();
        assert_eq!(
            err,
            MaskError::Mismatch {
                variable: "so".into(),
                mismatched: 4,
                total: 12
            }
        );
    }

    #[test]
    fn mismatch_at_later_time_is_caught() {
        let masked = apply_mask(&dataset(), &wetmask()).unwrap();
        let mut so = masked.require_field("so").unwrap().array().data().clone();
        so[[1, 0, 0]] = f64::NAN;
        let mut broken = masked.clone();
        broken
            .insert_field("so", DataArray::new(["time", "lev", "x"], so).unwrap())
            .unwrap();
        assert!(matches!(
            assert_mask_match(&broken, &wetmask()),
            Err(MaskError::Mismatch { mismatched: 1, .. })
        ));
    }

    #[test]
    fn require_constant_policy_propagates() {
        let err = apply_mask_with(&dataset(), &wetmask(), MaskReduction::RequireConstant)
            .unwrap_err();
        assert!(matches!(err, MaskError::NonConstantReduction { .. }));
    }

    #[test]
    fn mask_with_foreign_size_is_dataset_error() {
        let mask = Mask::filled(["x"], &[4], true).unwrap();
        assert!(matches!(
            apply_mask(&dataset(), &mask),
            Err(MaskError::Dataset(_))
        ));
    }
}
