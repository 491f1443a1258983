//! z* vertical cell extent.

use oemu_dataset::Dataset;
use tracing::debug;

use crate::error::VerticalError;

/// Recompute the time-varying cell thickness of a z* model and attach it as
/// coordinate `dz_name`.
///
/// `thkcello` is the nominal thickness; the actual thickness is
/// `thkcello * (deptho + zos) / deptho`. Each input may be a field or a
/// coordinate. Fails with [`VerticalError::MissingInputs`] naming only the
/// inputs that are absent.
pub fn infer_vertical_cell_extent(ds: &Dataset, dz_name: &str) -> Result<Dataset, VerticalError> {
    const REQUIRED: [&str; 3] = ["thkcello", "deptho", "zos"];

    let (Some(thkcello), Some(deptho), Some(zos)) = (
        ds.variable(REQUIRED[0]),
        ds.variable(REQUIRED[1]),
        ds.variable(REQUIRED[2]),
    ) else {
        let missing = REQUIRED
            .iter()
            .filter(|name| ds.variable(name).is_none())
            .map(|name| name.to_string())
            .collect();
        return Err(VerticalError::MissingInputs {
            missing,
            purpose: "infer vertical cell extent".to_string(),
        });
    };

    let dz = thkcello.mul(&deptho.add(zos)?)?.div(deptho)?;
    debug!(dz_name, dims = ?dz.dims(), "inferred z* cell extent");

    let mut out = ds.clone();
    out.insert_coord(dz_name, dz)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use oemu_dataset::DataArray;

    fn columns() -> Dataset {
        Dataset::new()
            .with_coord("thkcello", DataArray::from_vec("lev", vec![10.0, 20.0]))
            .unwrap()
            .with_coord("deptho", DataArray::from_vec("x", vec![100.0, 50.0]))
            .unwrap()
            .with_field(
                "zos",
                DataArray::from_shape_vec(["time", "x"], &[1, 2], vec![1.0, -0.5]).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn stretches_nominal_thickness() {
        let ds = infer_vertical_cell_extent(&columns(), "dz").unwrap();
        let dz = ds.require_coord("dz").unwrap();
        assert_eq!(dz.dims(), &["lev".to_string(), "x".to_string(), "time".to_string()]);
        assert_abs_diff_eq!(dz.data()[[0, 0, 0]], 10.0 * 101.0 / 100.0);
        assert_abs_diff_eq!(dz.data()[[1, 1, 0]], 20.0 * 49.5 / 50.0);
    }

    #[test]
    fn custom_name() {
        let ds = infer_vertical_cell_extent(&columns(), "thk").unwrap();
        assert!(ds.coord("thk").is_some());
        assert!(ds.coord("dz").is_none());
    }

    #[test]
    fn reports_only_missing_inputs() {
        let mut ds = columns();
        ds.remove_field("zos");
        let err = infer_vertical_cell_extent(&ds, "dz").unwrap_err();
        assert_eq!(
            err,
            VerticalError::MissingInputs {
                missing: vec!["zos".into()],
                purpose: "infer vertical cell extent".into(),
            }
        );
    }
}
