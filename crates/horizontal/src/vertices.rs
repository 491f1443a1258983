//! Corner-vertex geometry of curvilinear grids.
//!
//! Model output usually stores four corners per cell, dims `(y, x, vertex)`.
//! Conservative regridding wants the shared-vertex form instead: one
//! `(ny + 1, nx + 1)` array each for longitude and latitude (`lon_b`,
//! `lat_b`, dims `(y_vertices, x_vertices)`).

use std::ops::Range;

use ndarray::{Array2, Array3, ArrayView3, Ix3, s};
use oemu_dataset::{DataArray, Dataset, DatasetError, Deferred};
use tracing::debug;

use crate::config::{CornerOrder, RegridConfig};
use crate::error::{GridSide, HorizontalError};

/// Vertex longitude coordinate name.
pub const LON_B: &str = "lon_b";
/// Vertex latitude coordinate name.
pub const LAT_B: &str = "lat_b";
pub const X_VERTICES: &str = "x_vertices";
pub const Y_VERTICES: &str = "y_vertices";

// ---------------------------------------------------------------------------
// bounds_to_vertices
// ---------------------------------------------------------------------------

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Guess the corner order from shared corners between neighbouring cells.
///
/// In counterclockwise order corner 1 of cell `(0, 0)` is corner 0 of
/// cell `(0, 1)`; in clockwise order corner 3 is. Empty grids and cells
/// without exactly four corners fall back to counterclockwise.
pub fn detect_corner_order(bounds: ArrayView3<'_, f64>) -> CornerOrder {
    let (ny, nx, nv) = bounds.dim();
    if nv != 4 || ny == 0 || nx == 0 {
        return CornerOrder::Counterclockwise;
    }
    if nx > 1 {
        if close(bounds[[0, 0, 1]], bounds[[0, 1, 0]]) {
            return CornerOrder::Counterclockwise;
        }
        if close(bounds[[0, 0, 3]], bounds[[0, 1, 0]]) {
            return CornerOrder::Clockwise;
        }
    }
    if ny > 1 {
        if close(bounds[[0, 0, 3]], bounds[[1, 0, 0]]) {
            return CornerOrder::Counterclockwise;
        }
        if close(bounds[[0, 0, 1]], bounds[[1, 0, 0]]) {
            return CornerOrder::Clockwise;
        }
    }
    CornerOrder::Counterclockwise
}

/// Convert per-cell corners `(ny, nx, 4)` to shared vertices `(ny + 1, nx + 1)`.
///
/// Vertex `(j, i)` is corner 0 of cell `(j, i)`; the last column, last row
/// and far corner come from corners 1, 3 and 2 of the edge cells (with 1
/// and 3 swapped for clockwise input). `order = None` detects the order.
pub fn bounds_to_vertices(
    bounds: ArrayView3<'_, f64>,
    order: Option<CornerOrder>,
) -> Result<Array2<f64>, HorizontalError> {
    let (ny, nx, nv) = bounds.dim();
    if nv != 4 {
        return Err(DatasetError::SizeConflict {
            dim: "vertex".to_string(),
            expected: 4,
            got: nv,
        }
        .into());
    }
    if ny == 0 || nx == 0 {
        return Err(HorizontalError::InvalidConfig {
            reason: format!("cannot build vertices for an empty {ny}x{nx} grid"),
        });
    }
    let order = order.unwrap_or_else(|| detect_corner_order(bounds));
    let (right, top) = match order {
        CornerOrder::Counterclockwise => (1, 3),
        CornerOrder::Clockwise => (3, 1),
    };

    let mut v = Array2::<f64>::zeros((ny + 1, nx + 1));
    v.slice_mut(s![..ny, ..nx]).assign(&bounds.slice(s![.., .., 0]));
    v.slice_mut(s![..ny, nx]).assign(&bounds.slice(s![.., nx - 1, right]));
    v.slice_mut(s![ny, ..nx]).assign(&bounds.slice(s![ny - 1, .., top]));
    v[[ny, nx]] = bounds[[ny - 1, nx - 1, 2]];
    Ok(v)
}

// ---------------------------------------------------------------------------
// VertexGrid
// ---------------------------------------------------------------------------

/// Shared-vertex longitude/latitude arrays of a grid, `(ny + 1, nx + 1)` each.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGrid {
    lon_b: Array2<f64>,
    lat_b: Array2<f64>,
}

impl VertexGrid {
    pub fn new(lon_b: Array2<f64>, lat_b: Array2<f64>) -> Result<Self, HorizontalError> {
        if lon_b.dim() != lat_b.dim() {
            return Err(HorizontalError::InvalidConfig {
                reason: format!(
                    "lon_b shape {:?} differs from lat_b shape {:?}",
                    lon_b.dim(),
                    lat_b.dim()
                ),
            });
        }
        if lon_b.nrows() < 2 || lon_b.ncols() < 2 {
            return Err(HorizontalError::InvalidConfig {
                reason: format!("vertex arrays need at least 2x2 points, got {:?}", lon_b.dim()),
            });
        }
        Ok(Self { lon_b, lat_b })
    }

    /// Number of cell rows.
    pub fn ny(&self) -> usize {
        self.lon_b.nrows() - 1
    }

    /// Number of cell columns.
    pub fn nx(&self) -> usize {
        self.lon_b.ncols() - 1
    }

    pub fn lon_b(&self) -> &Array2<f64> {
        &self.lon_b
    }

    pub fn lat_b(&self) -> &Array2<f64> {
        &self.lat_b
    }

    /// Corners of cell `(j, i)` as `(lon, lat)`, walking the cell boundary.
    pub fn cell_corners(&self, j: usize, i: usize) -> [(f64, f64); 4] {
        let at = |jj: usize, ii: usize| (self.lon_b[[jj, ii]], self.lat_b[[jj, ii]]);
        [at(j, i), at(j, i + 1), at(j + 1, i + 1), at(j + 1, i)]
    }

    /// The vertices of the cell window `y` x `x`.
    pub fn window(&self, y: Range<usize>, x: Range<usize>) -> Result<Self, HorizontalError> {
        let rows = y.start..y.end + 1;
        let cols = x.start..x.end + 1;
        Self::new(
            self.lon_b.slice(s![rows.clone(), cols.clone()]).to_owned(),
            self.lat_b.slice(s![rows, cols]).to_owned(),
        )
    }

    /// Vertex coordinates as named arrays on `(y_vertices, x_vertices)`.
    pub fn to_coords(&self) -> Result<(DataArray, DataArray), HorizontalError> {
        let lon = DataArray::new([Y_VERTICES, X_VERTICES], self.lon_b.clone().into_dyn())?;
        let lat = DataArray::new([Y_VERTICES, X_VERTICES], self.lat_b.clone().into_dyn())?;
        Ok((lon, lat))
    }
}

// ---------------------------------------------------------------------------
// Reading geometry from a dataset
// ---------------------------------------------------------------------------

fn vertex_array(a: &DataArray) -> Result<Array2<f64>, HorizontalError> {
    let t = a.transpose(&[Y_VERTICES, X_VERTICES])?;
    Ok(t.into_data()
        .into_dimensionality()
        .map_err(DatasetError::from)?)
}

fn cell_bounds(a: &DataArray, config: &RegridConfig) -> Result<Array3<f64>, HorizontalError> {
    let t = a.transpose(&[config.y_dim(), config.x_dim(), config.vertex_dim()])?;
    Ok(t.into_data()
        .into_dimensionality::<Ix3>()
        .map_err(DatasetError::from)?)
}

/// Per-cell corner arrays `(lon, lat)` of `ds`, optionally restricted to a window.
fn corner_bounds(
    ds: &Dataset,
    config: &RegridConfig,
    side: GridSide,
    window: Option<(&Range<usize>, &Range<usize>)>,
) -> Result<(Array3<f64>, Array3<f64>), HorizontalError> {
    let (Some(lon), Some(lat)) = (ds.variable(config.lon_bounds()), ds.variable(config.lat_bounds()))
    else {
        let missing = [config.lon_bounds(), config.lat_bounds()]
            .into_iter()
            .filter(|n| ds.variable(n).is_none())
            .map(str::to_string)
            .collect();
        return Err(HorizontalError::MissingGeometry { side, missing });
    };
    let (lon, lat) = match window {
        Some((y, x)) => (
            lon.slice_dim(config.y_dim(), y.clone())?
                .slice_dim(config.x_dim(), x.clone())?,
            lat.slice_dim(config.y_dim(), y.clone())?
                .slice_dim(config.x_dim(), x.clone())?,
        ),
        None => (lon.clone(), lat.clone()),
    };
    Ok((cell_bounds(&lon, config)?, cell_bounds(&lat, config)?))
}

/// Derive vertex geometry from the per-cell corner coordinates of `ds`.
pub fn derive_vertices(
    ds: &Dataset,
    config: &RegridConfig,
    side: GridSide,
) -> Result<VertexGrid, HorizontalError> {
    let (lon, lat) = corner_bounds(ds, config, side, None)?;
    let grid = VertexGrid::new(
        bounds_to_vertices(lon.view(), config.corner_order())?,
        bounds_to_vertices(lat.view(), config.corner_order())?,
    )?;
    debug!(%side, ny = grid.ny(), nx = grid.nx(), "derived vertex geometry");
    Ok(grid)
}

/// Vertex geometry of `ds`, computed only when forced and only if `ds` does
/// not already carry `lon_b` / `lat_b`.
pub fn vertex_geometry<'a>(
    ds: &'a Dataset,
    config: &'a RegridConfig,
    side: GridSide,
) -> Deferred<'a, Result<VertexGrid, HorizontalError>> {
    match (ds.coord(LON_B), ds.coord(LAT_B)) {
        (Some(lon), Some(lat)) => Deferred::ready(
            vertex_array(lon).and_then(|lon| VertexGrid::new(lon, vertex_array(lat)?)),
        ),
        _ => Deferred::new(move || derive_vertices(ds, config, side)),
    }
}

/// Attach `lon_b` / `lat_b` to `ds` unless already present.
pub fn with_vertex_coords(
    ds: &Dataset,
    config: &RegridConfig,
    side: GridSide,
) -> Result<Dataset, HorizontalError> {
    let geometry = vertex_geometry(ds, config, side);
    if geometry.is_precomputed() {
        return Ok(ds.clone());
    }
    let grid = geometry.force().as_ref().map_err(Clone::clone)?;
    let (lon, lat) = grid.to_coords()?;
    let mut out = ds.clone();
    out.insert_coord(LON_B, lon)?;
    out.insert_coord(LAT_B, lat)?;
    Ok(out)
}

/// Vertex geometry of the cell window `y` x `x` only.
pub(crate) fn window_vertices(
    ds: &Dataset,
    config: &RegridConfig,
    side: GridSide,
    y: &Range<usize>,
    x: &Range<usize>,
) -> Result<VertexGrid, HorizontalError> {
    if let (Some(lon), Some(lat)) = (ds.coord(LON_B), ds.coord(LAT_B)) {
        let grid = VertexGrid::new(vertex_array(lon)?, vertex_array(lat)?)?;
        return grid.window(y.clone(), x.clone());
    }
    let (lon, lat) = corner_bounds(ds, config, side, Some((y, x)))?;
    VertexGrid::new(
        bounds_to_vertices(lon.view(), config.corner_order())?,
        bounds_to_vertices(lat.view(), config.corner_order())?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    /// Counterclockwise corners of a regular grid with `dx` x `dy` degree cells.
    fn regular_bounds(ny: usize, nx: usize, dx: f64, dy: f64) -> (Array3<f64>, Array3<f64>) {
        let mut lon = Array3::zeros((ny, nx, 4));
        let mut lat = Array3::zeros((ny, nx, 4));
        for j in 0..ny {
            for i in 0..nx {
                let (w, e) = (i as f64 * dx, (i + 1) as f64 * dx);
                let (so, no) = (-30.0 + j as f64 * dy, -30.0 + (j + 1) as f64 * dy);
                for (k, (lo, la)) in [(w, so), (e, so), (e, no), (w, no)].into_iter().enumerate() {
                    lon[[j, i, k]] = lo;
                    lat[[j, i, k]] = la;
                }
            }
        }
        (lon, lat)
    }

    fn clockwise(b: &Array3<f64>) -> Array3<f64> {
        let mut out = b.clone();
        for k in 0..4 {
            let src = [0, 3, 2, 1][k];
            out.slice_mut(s![.., .., k]).assign(&b.slice(s![.., .., src]));
        }
        out
    }

    #[test]
    fn counterclockwise_vertices() {
        let (lon, lat) = regular_bounds(2, 3, 10.0, 5.0);
        let lon_b = bounds_to_vertices(lon.view(), Some(CornerOrder::Counterclockwise)).unwrap();
        let lat_b = bounds_to_vertices(lat.view(), Some(CornerOrder::Counterclockwise)).unwrap();
        assert_eq!(lon_b.dim(), (3, 4));
        assert_eq!(lon_b.row(0).to_vec(), vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(lat_b.column(0).to_vec(), vec![-30.0, -25.0, -20.0]);
        assert_eq!(lon_b[[2, 3]], 30.0);
        assert_eq!(lat_b[[2, 3]], -20.0);
    }

    #[test]
    fn clockwise_matches_counterclockwise() {
        let (lon, lat) = regular_bounds(3, 3, 1.0, 1.0);
        let ccw = bounds_to_vertices(lon.view(), Some(CornerOrder::Counterclockwise)).unwrap();
        let cw = bounds_to_vertices(clockwise(&lon).view(), Some(CornerOrder::Clockwise)).unwrap();
        assert_eq!(ccw, cw);
        let ccw = bounds_to_vertices(lat.view(), None).unwrap();
        let cw = bounds_to_vertices(clockwise(&lat).view(), None).unwrap();
        assert_eq!(ccw, cw);
    }

    #[test]
    fn detects_order() {
        let (lon, lat) = regular_bounds(2, 2, 1.0, 1.0);
        assert_eq!(detect_corner_order(lon.view()), CornerOrder::Counterclockwise);
        assert_eq!(detect_corner_order(clockwise(&lat).view()), CornerOrder::Clockwise);
    }

    #[test]
    fn detect_order_falls_back_on_degenerate_shapes() {
        for shape in [(0, 2, 4), (2, 0, 4), (1, 2, 3), (2, 2, 5)] {
            let b = Array3::<f64>::zeros(shape);
            assert_eq!(detect_corner_order(b.view()), CornerOrder::Counterclockwise, "{shape:?}");
        }
    }

    #[test]
    fn wrong_corner_count() {
        let b = Array3::<f64>::zeros((2, 2, 3));
        assert!(matches!(
            bounds_to_vertices(b.view(), None),
            Err(HorizontalError::Dataset(DatasetError::SizeConflict { .. }))
        ));
    }

    fn dataset_with_bounds(ny: usize, nx: usize) -> Dataset {
        let (lon, lat) = regular_bounds(ny, nx, 2.0, 2.0);
        Dataset::new()
            .with_coord("lon_verticies", DataArray::new(["y", "x", "vertex"], lon.into_dyn()).unwrap())
            .unwrap()
            .with_coord("lat_verticies", DataArray::new(["y", "x", "vertex"], lat.into_dyn()).unwrap())
            .unwrap()
    }

    #[test]
    fn deferred_geometry_is_memoized_once_attached() {
        let ds = dataset_with_bounds(3, 4);
        let config = RegridConfig::new();
        let lazy = vertex_geometry(&ds, &config, GridSide::Source);
        assert!(!lazy.is_precomputed());
        let grid = lazy.force().as_ref().unwrap();
        assert_eq!((grid.ny(), grid.nx()), (3, 4));

        let attached = with_vertex_coords(&ds, &config, GridSide::Source).unwrap();
        assert_eq!(attached.require_coord(LON_B).unwrap().shape(), &[4, 5]);
        let again = vertex_geometry(&attached, &config, GridSide::Source);
        assert!(again.is_precomputed());
        assert_eq!(again.force().as_ref().unwrap(), grid);
    }

    #[test]
    fn missing_geometry_names_absent_coords() {
        let ds = dataset_with_bounds(2, 2);
        let mut partial = ds.clone();
        partial.remove_coord("lat_verticies");
        let err = derive_vertices(&partial, &RegridConfig::new(), GridSide::Target).unwrap_err();
        assert_eq!(
            err,
            HorizontalError::MissingGeometry {
                side: GridSide::Target,
                missing: vec!["lat_verticies".into()],
            }
        );
    }

    #[test]
    fn window_vertices_from_bounds_and_from_vertices_agree() {
        let ds = dataset_with_bounds(5, 6);
        let config = RegridConfig::new();
        let from_bounds = window_vertices(&ds, &config, GridSide::Source, &(1..3), &(2..5)).unwrap();
        let attached = with_vertex_coords(&ds, &config, GridSide::Source).unwrap();
        let mut vertices_only = attached.clone();
        vertices_only.remove_coord("lon_verticies");
        vertices_only.remove_coord("lat_verticies");
        let from_vertices =
            window_vertices(&vertices_only, &config, GridSide::Source, &(1..3), &(2..5)).unwrap();
        assert_eq!(from_bounds, from_vertices);
        assert_eq!((from_bounds.ny(), from_bounds.nx()), (2, 3));
    }
}
