//! Error types for the oemu-horizontal crate.

use std::fmt;

use oemu_dataset::DatasetError;

/// Which grid of a regridding call an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSide {
    Source,
    Target,
}

impl fmt::Display for GridSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridSide::Source => f.write_str("source dataset"),
            GridSide::Target => f.write_str("target dataset"),
        }
    }
}

/// Error type for all fallible operations in the oemu-horizontal crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HorizontalError {
    /// Returned when corner vertices are not increasing along a grid axis.
    #[error("vertex order of the {side} is wrong: {coord} is not increasing along {axis}")]
    VertexOrder {
        /// Malformed grid.
        side: GridSide,
        /// Vertex coordinate checked (`lon_b` or `lat_b`).
        coord: String,
        /// Vertex axis along which the check failed.
        axis: String,
    },

    /// Returned when a cell has zero area and degenerate cells are not ignored.
    #[error("degenerate cell in {side} at (y={y}, x={x})")]
    DegenerateCell {
        /// Grid containing the cell.
        side: GridSide,
        /// Row index.
        y: usize,
        /// Column index.
        x: usize,
    },

    /// Returned when the vertex-order check patch lies outside the grid.
    #[error("check patch {dim}[..{end}] exceeds {side} size {len}")]
    PatchOutOfBounds {
        /// Grid being checked.
        side: GridSide,
        /// Horizontal dimension.
        dim: String,
        /// Exclusive end of the patch.
        end: usize,
        /// Grid length along `dim`.
        len: usize,
    },

    /// Returned when neither vertex nor per-cell bound coordinates are present.
    #[error("{side} has no cell geometry: missing {missing:?}")]
    MissingGeometry {
        /// Grid lacking geometry.
        side: GridSide,
        /// Names that were looked for and not found.
        missing: Vec<String>,
    },

    /// Returned when a field's horizontal shape differs from the regridder's source grid.
    #[error("field '{variable}' has {dim}={got}, regridder expects {expected}")]
    GridMismatch {
        /// Offending field.
        variable: String,
        /// Horizontal dimension.
        dim: String,
        /// Source grid length.
        expected: usize,
        /// Field length.
        got: usize,
    },

    /// Returned when no conservative regridding backend is compiled in.
    #[error("regridding backend '{backend}' is unavailable: {remediation}")]
    BackendUnavailable {
        /// Requested backend.
        backend: String,
        /// How to make it available.
        remediation: String,
    },

    /// Returned when regridding weights are inconsistent with the grids.
    #[error("invalid regridding weights: {reason}")]
    InvalidWeights {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Wrapped error from the dataset model.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
