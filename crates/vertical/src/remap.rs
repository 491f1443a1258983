//! Conservative remapping of extensive content between depth grids.

use ndarray::{ArrayD, Axis, IxDyn, Zip};
use oemu_dataset::{DataArray, DepthBounds};

use crate::error::VerticalError;

/// A column-wise remapping from source cells to target cells.
///
/// Implementations receive per-cell extensive content (value times
/// thickness) for one water column and write per-target-cell content.
pub trait VerticalTransform {
    /// Number of source cells expected per column.
    fn n_source(&self) -> usize;

    /// Number of target cells written per column.
    fn n_target(&self) -> usize;

    /// Remap one column. `target.len()` equals [`n_target`](Self::n_target).
    fn remap_column(&self, source: &[f64], target: &mut [f64]);
}

/// Piecewise-constant conservative remapping.
///
/// Each source cell's content is split over the target cells in proportion
/// to the overlap length of the two depth intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct ConservativeTransform {
    n_source: usize,
    /// For each target cell, `(source index, fraction of that source cell)`.
    weights: Vec<Vec<(usize, f64)>>,
}

impl ConservativeTransform {
    pub fn new(source: &DepthBounds, target: &DepthBounds) -> Self {
        let s = source.edges();
        let t = target.edges();
        let mut weights = vec![Vec::new(); target.n_cells()];
        let (mut i, mut j) = (0, 0);
        while i + 1 < s.len() && j + 1 < t.len() {
            let lo = s[i].max(t[j]);
            let hi = s[i + 1].min(t[j + 1]);
            if hi > lo {
                weights[j].push((i, (hi - lo) / (s[i + 1] - s[i])));
            }
            if s[i + 1] < t[j + 1] {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self {
            n_source: source.n_cells(),
            weights,
        }
    }

    /// Target cells that overlap no source cell.
    pub fn uncovered(&self) -> Vec<usize> {
        self.weights
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_empty())
            .map(|(j, _)| j)
            .collect()
    }

    /// Overlap weights of target cell `j`.
    pub fn weights(&self, j: usize) -> &[(usize, f64)] {
        &self.weights[j]
    }
}

impl VerticalTransform for ConservativeTransform {
    fn n_source(&self) -> usize {
        self.n_source
    }

    fn n_target(&self) -> usize {
        self.weights.len()
    }

    fn remap_column(&self, source: &[f64], target: &mut [f64]) {
        for (out, w) in target.iter_mut().zip(&self.weights) {
            let mut sum = 0.0;
            let mut any = false;
            for &(i, frac) in w {
                let v = source[i];
                if !v.is_nan() {
                    sum += v * frac;
                    any = true;
                }
            }
            *out = if any { sum } else { f64::NAN };
        }
    }
}

/// Apply `transform` along `dim` of every column of `array`.
pub fn remap_along<T: VerticalTransform + ?Sized>(
    array: &DataArray,
    dim: &str,
    transform: &T,
) -> Result<DataArray, VerticalError> {
    let ax = array.axis_of(dim)?;
    let n_source = array.shape()[ax];
    if n_source != transform.n_source() {
        return Err(VerticalError::LevelMismatch {
            dim: dim.to_string(),
            expected: transform.n_source(),
            got: n_source,
        });
    }

    let mut shape = array.shape().to_vec();
    shape[ax] = transform.n_target();
    let mut out = ArrayD::<f64>::zeros(IxDyn(&shape));

    let mut column = vec![0.0; n_source];
    let mut remapped = vec![0.0; transform.n_target()];
    Zip::from(array.data().lanes(Axis(ax)))
        .and(out.lanes_mut(Axis(ax)))
        .for_each(|src, mut dst| {
            for (c, &v) in column.iter_mut().zip(src.iter()) {
                *c = v;
            }
            transform.remap_column(&column, &mut remapped);
            for (d, &v) in dst.iter_mut().zip(&remapped) {
                *d = v;
            }
        });

    Ok(DataArray::new(array.dims().to_vec(), out)?)
}
