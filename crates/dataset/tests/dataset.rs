//! Integration tests for the oemu-dataset model.

use std::collections::BTreeMap;

use approx::assert_abs_diff_eq;
use oemu_dataset::{DataArray, Dataset, DepthBounds, FieldKind, Mask, Schema};

fn ramp(dims: &[&str], shape: &[usize]) -> DataArray {
    let n: usize = shape.iter().product();
    DataArray::from_shape_vec(dims.iter().copied(), shape, (0..n).map(|v| v as f64).collect())
        .unwrap()
}

// ---------------------------------------------------------------------------
// Building a small canonical-shaped dataset
// ---------------------------------------------------------------------------

#[test]
fn build_small_dataset_from_schema_sizes() {
    let schema = Schema::canonical()
        .with_size("x", 4)
        .with_size("y", 3)
        .with_size("lev", 2)
        .with_layout(oemu_dataset::ChannelLayout::new(["thetao"], 2, ["zos"]));
    assert!(schema.validate().is_ok());

    let bounds = DepthBounds::new(vec![0.0, 10.0, 30.0]).unwrap();
    let ds = Dataset::new()
        .with_field("thetao", ramp(&["time", "lev", "y", "x"], &[2, 2, 3, 4]))
        .unwrap()
        .with_field("zos", ramp(&["time", "y", "x"], &[2, 3, 4]))
        .unwrap()
        .with_coord("lev", bounds.centers_array("lev"))
        .unwrap()
        .with_coord("dz", bounds.thickness_array("lev"))
        .unwrap();

    for (dim, &n) in schema.sizes() {
        assert_eq!(ds.sizes()[dim], n, "dim {dim}");
    }
    assert_eq!(ds.fields_of_kind(FieldKind::Volumetric).count(), 1);
}

// ---------------------------------------------------------------------------
// Extensive quantity via broadcasting
// ---------------------------------------------------------------------------

#[test]
fn field_times_thickness_broadcasts_over_lev() {
    let field = DataArray::filled(["time", "lev", "x"], &[1, 2, 3], 2.0).unwrap();
    let dz = DataArray::from_vec("lev", vec![10.0, 20.0]);
    let content = field.mul(&dz).unwrap();
    assert_eq!(content.dims(), field.dims());
    let column: f64 = content.isel("time", 0).unwrap().isel("x", 1).unwrap().data().sum();
    assert_abs_diff_eq!(column, 60.0);
}

// ---------------------------------------------------------------------------
// Swapped horizontal axes
// ---------------------------------------------------------------------------

#[test]
fn swap_labels_then_transpose_restores_values() {
    let a = ramp(&["time", "y", "x"], &[1, 2, 3]);
    let map = BTreeMap::from([
        ("x".to_string(), "y".to_string()),
        ("y".to_string(), "x".to_string()),
    ]);
    let relabelled = a.rename_dims(&map).unwrap();
    let back = relabelled.transpose(&["time", "y", "x"]).unwrap();
    assert_eq!(back.shape(), &[1, 3, 2]);
    assert_eq!(back.data()[[0, 2, 1]], a.data()[[0, 1, 2]]);
}

#[test]
fn mask_from_notnull_masks_same_cells() {
    let mut values = vec![1.0; 6];
    values[4] = f64::NAN;
    let a = DataArray::from_shape_vec(["y", "x"], &[2, 3], values).unwrap();
    let mask: Mask = a.notnull();
    let b = DataArray::filled(["time", "y", "x"], &[2, 2, 3], 5.0).unwrap();
    let masked = b.where_mask(&mask).unwrap();
    assert_eq!(masked.count_missing(), 2);
    assert!(masked.data()[[1, 1, 1]].is_nan());
}
