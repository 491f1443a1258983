//! Reducing a mask onto a field's dimension set.

use oemu_dataset::Mask;

use crate::error::MaskError;

/// How a mask dimension absent from the target field is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskReduction {
    /// Take index 0 along the extra dimension.
    ///
    /// Assumes the mask is constant along that dimension, e.g. the top depth
    /// level stands for a surface field. Not verified.
    #[default]
    FirstIndex,
    /// Take index 0, but first verify every other index matches it.
    RequireConstant,
}

/// Drop every mask dimension not in `dims` according to `reduction`.
///
/// A mask already confined to `dims` is returned unchanged.
pub fn reduce_mask(mask: &Mask, dims: &[String], reduction: MaskReduction) -> Result<Mask, MaskError> {
    let extra: Vec<String> = mask
        .dims()
        .iter()
        .filter(|d| !dims.contains(*d))
        .cloned()
        .collect();

    let mut reduced = mask.clone();
    for dim in &extra {
        let first = reduced.isel(dim, 0)?;
        if reduction == MaskReduction::RequireConstant {
            let len = reduced.len_of(dim).unwrap_or(0);
            for index in 1..len {
                if reduced.isel(dim, index)? != first {
                    return Err(MaskError::NonConstantReduction {
                        dim: dim.clone(),
                        index,
                    });
                }
            }
        }
        reduced = first;
    }
    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn dims(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn column_mask() -> Mask {
        // dims (lev, x): top level fully wet, bottom level has one dry cell
        let data =
            ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![true, true, true, true, false, true]).unwrap();
        Mask::new(["lev", "x"], data).unwrap()
    }

    #[test]
    fn first_index_takes_top_level() {
        let reduced = reduce_mask(&column_mask(), &dims(&["time", "x"]), MaskReduction::FirstIndex)
            .unwrap();
        assert_eq!(reduced.dims(), &dims(&["x"]));
        assert_eq!(reduced.count_wet(), 3);
    }

    #[test]
    fn no_extra_dims_is_identity() {
        let m = column_mask();
        let reduced = reduce_mask(&m, &dims(&["x", "lev", "time"]), MaskReduction::RequireConstant)
            .unwrap();
        assert_eq!(reduced, m);
    }

    #[test]
    fn require_constant_rejects_varying_dim() {
        let err = reduce_mask(&column_mask(), &dims(&["x"]), MaskReduction::RequireConstant)
            .unwrap_err();
        assert_eq!(
            err,
            MaskError::NonConstantReduction {
                dim: "lev".into(),
                index: 1
            }
        );
    }

    #[test]
    fn require_constant_accepts_constant_dim() {
        let m = Mask::filled(["lev", "x"], &[4, 2], true).unwrap();
        let reduced = reduce_mask(&m, &dims(&["x"]), MaskReduction::RequireConstant).unwrap();
        assert_eq!(reduced.shape(), &[2]);
    }
}
