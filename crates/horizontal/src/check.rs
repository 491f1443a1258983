//! Vertex-order precondition for conservative regridding.

use ndarray::{Array2, Axis};
use oemu_dataset::Dataset;
use tracing::debug;

use crate::config::RegridConfig;
use crate::error::{GridSide, HorizontalError};
use crate::vertices::{LAT_B, LON_B, X_VERTICES, Y_VERTICES, window_vertices};

fn strictly_increasing(a: &Array2<f64>, axis: Axis) -> bool {
    a.lanes(axis)
        .into_iter()
        .all(|lane| lane.windows(2).into_iter().all(|w| w[1] > w[0]))
}

/// Check that vertex longitude increases along `x_vertices` and vertex
/// latitude along `y_vertices` inside the configured patch of `ds`.
///
/// Only the patch is materialized.
pub fn check_vertex_order(
    ds: &Dataset,
    config: &RegridConfig,
    side: GridSide,
) -> Result<(), HorizontalError> {
    let patch = config.patch();
    let sizes = ds.sizes();
    for (dim, range) in [(config.x_dim(), &patch.x), (config.y_dim(), &patch.y)] {
        let len = sizes.get(dim).copied().unwrap_or(0);
        if range.end > len {
            return Err(HorizontalError::PatchOutOfBounds {
                side,
                dim: dim.to_string(),
                end: range.end,
                len,
            });
        }
    }

    let grid = window_vertices(ds, config, side, &patch.y, &patch.x)?;
    if !strictly_increasing(grid.lon_b(), Axis(1)) {
        return Err(HorizontalError::VertexOrder {
            side,
            coord: LON_B.to_string(),
            axis: X_VERTICES.to_string(),
        });
    }
    if !strictly_increasing(grid.lat_b(), Axis(0)) {
        return Err(HorizontalError::VertexOrder {
            side,
            coord: LAT_B.to_string(),
            axis: Y_VERTICES.to_string(),
        });
    }
    debug!(%side, "vertex order ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, s};
    use oemu_dataset::DataArray;

    use crate::config::CornerOrder;
    use crate::vertices::with_vertex_coords;

    fn grid(ny: usize, nx: usize) -> (Array3<f64>, Array3<f64>) {
        let mut lon = Array3::zeros((ny, nx, 4));
        let mut lat = Array3::zeros((ny, nx, 4));
        for j in 0..ny {
            for i in 0..nx {
                let (w, e) = (i as f64, i as f64 + 1.0);
                let (so, no) = (j as f64 - 10.0, j as f64 - 9.0);
                for (k, (lo, la)) in [(w, so), (e, so), (e, no), (w, no)].into_iter().enumerate() {
                    lon[[j, i, k]] = lo;
                    lat[[j, i, k]] = la;
                }
            }
        }
        (lon, lat)
    }

    fn dataset(lon: Array3<f64>, lat: Array3<f64>) -> Dataset {
        Dataset::new()
            .with_coord("lon_verticies", DataArray::new(["y", "x", "vertex"], lon.into_dyn()).unwrap())
            .unwrap()
            .with_coord("lat_verticies", DataArray::new(["y", "x", "vertex"], lat.into_dyn()).unwrap())
            .unwrap()
    }

    #[test]
    fn well_ordered_grid_passes() {
        let (lon, lat) = grid(24, 24);
        let ds = dataset(lon, lat);
        assert!(check_vertex_order(&ds, &RegridConfig::new(), GridSide::Source).is_ok());
    }

    #[test]
    fn flipped_latitude_fails() {
        let (lon, lat) = grid(24, 24);
        let flipped = lat.slice(s![..;-1, .., ..]).to_owned();
        // flip the corner roles too so each cell stays self-consistent
        let mut fixed = flipped.clone();
        fixed.slice_mut(s![.., .., 0]).assign(&flipped.slice(s![.., .., 3]));
        fixed.slice_mut(s![.., .., 1]).assign(&flipped.slice(s![.., .., 2]));
        fixed.slice_mut(s![.., .., 2]).assign(&flipped.slice(s![.., .., 1]));
        fixed.slice_mut(s![.., .., 3]).assign(&flipped.slice(s![.., .., 0]));
        let ds = dataset(lon, fixed);
        let config = RegridConfig::new().with_corner_order(Some(CornerOrder::Counterclockwise));
        let err = check_vertex_order(&ds, &config, GridSide::Target).unwrap_err();
        assert_eq!(
            err,
            HorizontalError::VertexOrder {
                side: GridSide::Target,
                coord: "lat_b".into(),
                axis: "y_vertices".into(),
            }
        );
    }

    #[test]
    fn patch_outside_grid() {
        let (lon, lat) = grid(10, 30);
        let ds = dataset(lon, lat);
        let err = check_vertex_order(&ds, &RegridConfig::new(), GridSide::Source).unwrap_err();
        assert!(matches!(
            err,
            HorizontalError::PatchOutOfBounds { ref dim, end: 22, len: 10, .. } if dim == "y"
        ));
    }

    #[test]
    fn attached_vertices_are_checked_directly() {
        let (lon, lat) = grid(4, 4);
        let config = RegridConfig::new().with_patch(0..3, 1..3);
        let ds = with_vertex_coords(&dataset(lon, lat), &config, GridSide::Source).unwrap();
        assert!(check_vertex_order(&ds, &config, GridSide::Source).is_ok());
    }
}
