//! Pluggable conservative-regridding backends.

use crate::config::RegridConfig;
use crate::error::HorizontalError;
use crate::vertices::VertexGrid;

/// Sparse regridding operator from a source grid to a target grid.
///
/// Row `t` (target cell `t = j * nx + i`) lists `(source cell, weight)`
/// pairs, where the weight is the overlap area divided by the target cell
/// area. A target cell fully covered by source cells has weights summing to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RegridWeights {
    source_shape: (usize, usize),
    target_shape: (usize, usize),
    rows: Vec<Vec<(usize, f64)>>,
}

impl RegridWeights {
    /// Build weights; shapes are `(ny, nx)` in cells.
    pub fn new(
        source_shape: (usize, usize),
        target_shape: (usize, usize),
        rows: Vec<Vec<(usize, f64)>>,
    ) -> Result<Self, HorizontalError> {
        let n_target = target_shape.0 * target_shape.1;
        if rows.len() != n_target {
            return Err(HorizontalError::InvalidWeights {
                reason: format!("{} rows for {n_target} target cells", rows.len()),
            });
        }
        let n_source = source_shape.0 * source_shape.1;
        if let Some((t, s)) = rows
            .iter()
            .enumerate()
            .find_map(|(t, row)| row.iter().find(|(s, _)| *s >= n_source).map(|(s, _)| (t, *s)))
        {
            return Err(HorizontalError::InvalidWeights {
                reason: format!("row {t} references source cell {s} of {n_source}"),
            });
        }
        Ok(Self {
            source_shape,
            target_shape,
            rows,
        })
    }

    pub fn source_shape(&self) -> (usize, usize) {
        self.source_shape
    }

    pub fn target_shape(&self) -> (usize, usize) {
        self.target_shape
    }

    pub fn rows(&self) -> &[Vec<(usize, f64)>] {
        &self.rows
    }

    /// Target cells that no source cell overlaps.
    pub fn n_unmapped(&self) -> usize {
        self.rows.iter().filter(|r| r.is_empty()).count()
    }

    /// Total number of stored weights.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// A solver that computes conservative overlap weights between two grids.
pub trait RegridBackend {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Compute weights from `source` to `target`.
    ///
    /// Implementations honour `config.periodic()` and
    /// `config.ignore_degenerate()`.
    fn weights(
        &self,
        source: &VertexGrid,
        target: &VertexGrid,
        config: &RegridConfig,
    ) -> Result<RegridWeights, HorizontalError>;
}

/// The backend compiled into this build.
///
/// # Errors
///
/// [`HorizontalError::BackendUnavailable`] when the crate was built without
/// the `builtin-solver` feature.
pub fn default_backend() -> Result<Box<dyn RegridBackend>, HorizontalError> {
    #[cfg(feature = "builtin-solver")]
    {
        Ok(Box::new(crate::conservative::ConservativeBackend::new()))
    }
    #[cfg(not(feature = "builtin-solver"))]
    {
        Err(HorizontalError::BackendUnavailable {
            backend: "conservative".to_string(),
            remediation: "rebuild oemu-horizontal with the `builtin-solver` feature, \
                          or pass your own RegridBackend to Regridder::new"
                .to_string(),
        })
    }
}
