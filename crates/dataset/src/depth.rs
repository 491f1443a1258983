//! Vertical cell boundaries.

use ndarray::Axis;

use crate::array::DataArray;
use crate::error::DatasetError;

/// N+1 strictly increasing depth boundaries describing N cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBounds {
    edges: Vec<f64>,
}

impl DepthBounds {
    /// Build from boundary values.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidDepthBounds`] if fewer than two values
    /// are given, a value is not finite, or the sequence is not strictly
    /// increasing.
    pub fn new(edges: Vec<f64>) -> Result<Self, DatasetError> {
        if edges.len() < 2 {
            return Err(DatasetError::InvalidDepthBounds {
                reason: format!("need at least 2 boundaries, got {}", edges.len()),
            });
        }
        if let Some(i) = edges.iter().position(|v| !v.is_finite()) {
            return Err(DatasetError::InvalidDepthBounds {
                reason: format!("boundary {i} is not finite"),
            });
        }
        if let Some(i) = edges.windows(2).position(|w| w[1] <= w[0]) {
            return Err(DatasetError::InvalidDepthBounds {
                reason: format!(
                    "boundaries must be strictly increasing: {} at index {} is not above {}",
                    edges[i + 1],
                    i + 1,
                    edges[i]
                ),
            });
        }
        Ok(Self { edges })
    }

    /// Build from a CF-style per-cell bounds array with dims `(cell_dim, bounds_dim)`.
    ///
    /// Vertex `i` is the lower bound of cell `i`; the final vertex is the
    /// upper bound of the last cell.
    pub fn from_cell_bounds(
        bounds: &DataArray,
        cell_dim: &str,
        bounds_dim: &str,
    ) -> Result<Self, DatasetError> {
        let b = bounds.transpose(&[cell_dim, bounds_dim])?;
        let data = b.data();
        let n = data.len_of(Axis(0));
        let two = data.len_of(Axis(1));
        if two != 2 {
            return Err(DatasetError::InvalidDepthBounds {
                reason: format!("bounds dimension '{bounds_dim}' has length {two}, expected 2"),
            });
        }
        if n == 0 {
            return Err(DatasetError::InvalidDepthBounds {
                reason: "no cells".to_string(),
            });
        }
        let mut edges: Vec<f64> = (0..n).map(|i| data[[i, 0]]).collect();
        edges.push(data[[n - 1, 1]]);
        Self::new(edges)
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn n_cells(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn top(&self) -> f64 {
        self.edges[0]
    }

    pub fn bottom(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Cell midpoints.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Cell thicknesses (always positive).
    pub fn thickness(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Centers as a one-dimensional array along `dim`.
    pub fn centers_array(&self, dim: &str) -> DataArray {
        DataArray::from_vec(dim, self.centers())
    }

    /// Thicknesses as a one-dimensional array along `dim`.
    pub fn thickness_array(&self, dim: &str) -> DataArray {
        DataArray::from_vec(dim, self.thickness())
    }
}
