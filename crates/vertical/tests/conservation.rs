//! Integration tests: column integrals survive vertical regridding.

use approx::assert_relative_eq;
use oemu_dataset::{DataArray, Dataset, DepthBounds};
use oemu_vertical::{
    VerticalConfig, VerticalError, canonical_depth_bounds, infer_vertical_cell_extent,
    vertical_regrid, vertical_regrid_with,
};

/// Non-uniform source grid spanning the same range as the canonical grid.
fn source_edges(n: usize) -> Vec<f64> {
    let bottom = 6500.0;
    (0..=n)
        .map(|k| bottom * (k as f64 / n as f64).powf(1.7))
        .collect()
}

fn source_dataset(edges: &[f64], nx: usize, nt: usize) -> Dataset {
    let nlev = edges.len() - 1;
    let bounds: Vec<f64> = edges.windows(2).flat_map(|w| [w[0], w[1]]).collect();
    let thickness: Vec<f64> = edges.windows(2).map(|w| w[1] - w[0]).collect();
    let centers: Vec<f64> = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
    let n = nx * nlev * nt;
    let values: Vec<f64> = (0..n).map(|i| 20.0 - (i % 17) as f64 * 0.9).collect();

    Dataset::new()
        .with_field(
            "thetao",
            DataArray::from_shape_vec(["time", "lev", "x"], &[nt, nlev, nx], values).unwrap(),
        )
        .unwrap()
        .with_coord(
            "lev_bounds",
            DataArray::from_shape_vec(["lev", "bnds"], &[nlev, 2], bounds).unwrap(),
        )
        .unwrap()
        .with_coord("dz", DataArray::from_vec("lev", thickness))
        .unwrap()
        .with_coord("lev", DataArray::from_vec("lev", centers))
        .unwrap()
}

fn column_integrals(field: &DataArray, dz: &[f64]) -> Vec<f64> {
    let (nt, nlev, nx) = (field.shape()[0], field.shape()[1], field.shape()[2]);
    let mut out = Vec::with_capacity(nt * nx);
    for t in 0..nt {
        for x in 0..nx {
            out.push((0..nlev).map(|k| field.data()[[t, k, x]] * dz[k]).sum());
        }
    }
    out
}

#[test]
fn canonical_target_conserves_integrals() {
    let edges = source_edges(33);
    let ds = source_dataset(&edges, 4, 2);
    let target = canonical_depth_bounds().unwrap();

    let out = vertical_regrid(&ds, &target).unwrap();
    assert_eq!(out.sizes()["lev"], 19);

    let src_dz: Vec<f64> = edges.windows(2).map(|w| w[1] - w[0]).collect();
    let before = column_integrals(ds.require_field("thetao").unwrap().array(), &src_dz);
    let after = column_integrals(
        out.require_field("thetao").unwrap().array(),
        &target.thickness(),
    );
    for (b, a) in before.iter().zip(&after) {
        assert_relative_eq!(*b, *a, max_relative = 1e-10);
    }
}

#[test]
fn regridding_onto_itself_is_identity() {
    let edges = source_edges(8);
    let ds = source_dataset(&edges, 3, 1);
    let target = DepthBounds::new(edges).unwrap();
    let out = vertical_regrid(&ds, &target).unwrap();
    let before = ds.require_field("thetao").unwrap().array();
    let after = out.require_field("thetao").unwrap().array();
    for (b, a) in before.data().iter().zip(after.data().iter()) {
        assert_relative_eq!(*b, *a, max_relative = 1e-12);
    }
}

#[test]
fn z_star_thickness_feeds_regrid() {
    let edges = [0.0, 10.0, 30.0];
    let ds = source_dataset(&edges, 2, 1)
        .with_coord("thkcello", DataArray::from_vec("lev", vec![10.0, 20.0]))
        .unwrap()
        .with_coord("deptho", DataArray::from_vec("x", vec![30.0, 30.0]))
        .unwrap()
        .with_field(
            "zos",
            DataArray::from_shape_vec(["time", "x"], &[1, 2], vec![0.0, 0.0]).unwrap(),
        )
        .unwrap();
    let ds = infer_vertical_cell_extent(&ds, "dz_star").unwrap();

    let config = VerticalConfig::new().with_thickness_coord("dz_star");
    let target = DepthBounds::new(vec![0.0, 30.0]).unwrap();
    let out = vertical_regrid_with(&ds, &target, &config).unwrap();
    // zero sea surface height leaves thickness nominal: mean over the column
    let thetao = ds.require_field("thetao").unwrap().array();
    let expected = (thetao.data()[[0, 0, 0]] * 10.0 + thetao.data()[[0, 1, 0]] * 20.0) / 30.0;
    let got = out.require_field("thetao").unwrap().array().data()[[0, 0, 0]];
    assert_relative_eq!(got, expected, max_relative = 1e-12);
    assert!(out.coord("dz_star").is_some());
}

#[test]
fn missing_thickness_is_configuration_error() {
    let edges = source_edges(4);
    let mut ds = source_dataset(&edges, 2, 1);
    ds.remove_coord("dz");
    let err = vertical_regrid(&ds, &canonical_depth_bounds().unwrap()).unwrap_err();
    match err {
        VerticalError::MissingInputs { missing, .. } => assert_eq!(missing, vec!["dz".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
}
