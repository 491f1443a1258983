//! Named-dimension numeric arrays.
//!
//! [`DataArray`] pairs an [`ndarray::ArrayD<f64>`] with one name per axis.
//! Every operation addresses axes by name, and binary arithmetic broadcasts
//! over the union of both operands' dimensions. Missing values are `NaN`.

use std::collections::BTreeMap;
use std::ops::Range;

use ndarray::{Array1, ArrayD, Axis, IxDyn, Slice, Zip};

use crate::error::DatasetError;
use crate::mask::Mask;

// ---------------------------------------------------------------------------
// Shared helpers (also used by Mask)
// ---------------------------------------------------------------------------

/// Check that `dims` names every axis exactly once.
pub(crate) fn check_dims(dims: &[String], ndim: usize) -> Result<(), DatasetError> {
    if dims.len() != ndim {
        return Err(DatasetError::RankMismatch {
            dims: dims.to_vec(),
            n_dims: dims.len(),
            ndim,
        });
    }
    for (i, d) in dims.iter().enumerate() {
        if dims[..i].contains(d) {
            return Err(DatasetError::DuplicateDimension { dim: d.clone() });
        }
    }
    Ok(())
}

/// Position of `dim` in `dims`, or [`DatasetError::MissingDimension`].
pub(crate) fn axis_position(dims: &[String], dim: &str) -> Result<usize, DatasetError> {
    dims.iter()
        .position(|d| d == dim)
        .ok_or_else(|| DatasetError::MissingDimension {
            dim: dim.to_string(),
            available: dims.to_vec(),
        })
}

/// Broadcast `data` (axes named `dims`) onto `target_dims` / `target_shape`.
///
/// Every source dimension must appear in the target with the same length.
/// Target dimensions absent from the source are repeated.
pub(crate) fn align<T: Clone>(
    data: &ArrayD<T>,
    dims: &[String],
    target_dims: &[String],
    target_shape: &[usize],
) -> Result<ArrayD<T>, DatasetError> {
    let mut positions = Vec::with_capacity(dims.len());
    for (i, d) in dims.iter().enumerate() {
        let Some(p) = target_dims.iter().position(|t| t == d) else {
            return Err(DatasetError::Broadcast {
                from: dims.to_vec(),
                to: target_dims.to_vec(),
            });
        };
        let len = data.len_of(Axis(i));
        if len != target_shape[p] {
            return Err(DatasetError::SizeConflict {
                dim: d.clone(),
                expected: target_shape[p],
                got: len,
            });
        }
        positions.push(p);
    }

    let mut order: Vec<usize> = (0..dims.len()).collect();
    order.sort_by_key(|&i| positions[i]);
    let present: Vec<usize> = order.iter().map(|&i| positions[i]).collect();

    let mut view = data.view().permuted_axes(order);
    for t in 0..target_dims.len() {
        if !present.contains(&t) {
            view = view.insert_axis(Axis(t));
        }
    }

    let broadcast = view
        .broadcast(IxDyn(target_shape))
        .ok_or_else(|| DatasetError::Broadcast {
            from: dims.to_vec(),
            to: target_dims.to_vec(),
        })?;
    Ok(broadcast.to_owned())
}

/// Select one index along `dim`, dropping the axis.
pub(crate) fn select_index<T: Clone>(
    data: &ArrayD<T>,
    dims: &[String],
    dim: &str,
    index: usize,
) -> Result<(Vec<String>, ArrayD<T>), DatasetError> {
    let ax = axis_position(dims, dim)?;
    let len = data.len_of(Axis(ax));
    if index >= len {
        return Err(DatasetError::IndexOutOfBounds {
            dim: dim.to_string(),
            index,
            len,
        });
    }
    let mut out_dims = dims.to_vec();
    out_dims.remove(ax);
    Ok((out_dims, data.index_axis(Axis(ax), index).to_owned()))
}

/// Reorder axes so that they follow `order`.
pub(crate) fn permute<T: Clone, S: AsRef<str>>(
    data: &ArrayD<T>,
    dims: &[String],
    order: &[S],
) -> Result<(Vec<String>, ArrayD<T>), DatasetError> {
    let new_dims: Vec<String> = order.iter().map(|s| s.as_ref().to_string()).collect();
    check_dims(&new_dims, data.ndim())?;
    let axes = new_dims
        .iter()
        .map(|d| axis_position(dims, d))
        .collect::<Result<Vec<_>, _>>()?;
    let permuted = data
        .view()
        .permuted_axes(axes)
        .as_standard_layout()
        .into_owned();
    Ok((new_dims, permuted))
}

// ---------------------------------------------------------------------------
// DataArray
// ---------------------------------------------------------------------------

/// A numeric array with named dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    dims: Vec<String>,
    data: ArrayD<f64>,
}

impl DataArray {
    /// Create a `DataArray` from dimension names and data.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::RankMismatch`] if the number of names differs
    /// from the array rank, or [`DatasetError::DuplicateDimension`] if a name
    /// repeats.
    pub fn new<S: Into<String>>(
        dims: impl IntoIterator<Item = S>,
        data: ArrayD<f64>,
    ) -> Result<Self, DatasetError> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        check_dims(&dims, data.ndim())?;
        Ok(Self { dims, data })
    }

    pub(crate) fn from_parts(dims: Vec<String>, data: ArrayD<f64>) -> Self {
        Self { dims, data }
    }

    /// Create a `DataArray` from a row-major vector of values.
    pub fn from_shape_vec<S: Into<String>>(
        dims: impl IntoIterator<Item = S>,
        shape: &[usize],
        values: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Self::new(dims, data)
    }

    /// Create a `DataArray` filled with a single value.
    pub fn filled<S: Into<String>>(
        dims: impl IntoIterator<Item = S>,
        shape: &[usize],
        value: f64,
    ) -> Result<Self, DatasetError> {
        Self::new(dims, ArrayD::from_elem(IxDyn(shape), value))
    }

    /// A one-dimensional array along `dim`.
    pub fn from_vec(dim: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            dims: vec![dim.into()],
            data: Array1::from_vec(values).into_dyn(),
        }
    }

    /// Dimension names in axis order.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Underlying data.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Consume the array and return the underlying data.
    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Axis lengths.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Whether the array has a dimension called `dim`.
    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Axis index of `dim`.
    pub fn axis_of(&self, dim: &str) -> Result<usize, DatasetError> {
        axis_position(&self.dims, dim)
    }

    /// Length of `dim`, if present.
    pub fn len_of(&self, dim: &str) -> Option<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(|ax| self.data.len_of(Axis(ax)))
    }

    /// Map of dimension name to length.
    pub fn sizes(&self) -> BTreeMap<String, usize> {
        self.dims
            .iter()
            .cloned()
            .zip(self.data.shape().iter().copied())
            .collect()
    }

    /// Select a single index along `dim`; the dimension is dropped.
    pub fn isel(&self, dim: &str, index: usize) -> Result<Self, DatasetError> {
        let (dims, data) = select_index(&self.data, &self.dims, dim, index)?;
        Ok(Self { dims, data })
    }

    /// Keep the half-open `range` along `dim`.
    pub fn slice_dim(&self, dim: &str, range: Range<usize>) -> Result<Self, DatasetError> {
        let ax = self.axis_of(dim)?;
        let len = self.data.len_of(Axis(ax));
        if range.end > len || range.start > range.end {
            return Err(DatasetError::IndexOutOfBounds {
                dim: dim.to_string(),
                index: range.end,
                len,
            });
        }
        let data = self
            .data
            .slice_axis(Axis(ax), Slice::from(range))
            .to_owned();
        Ok(Self {
            dims: self.dims.clone(),
            data,
        })
    }

    /// Rename a single dimension.
    pub fn rename_dim(&self, from: &str, to: &str) -> Result<Self, DatasetError> {
        let ax = self.axis_of(from)?;
        let mut dims = self.dims.clone();
        dims[ax] = to.to_string();
        check_dims(&dims, self.ndim())?;
        Ok(Self {
            dims,
            data: self.data.clone(),
        })
    }

    /// Rename dimensions simultaneously; names absent from `map` are kept.
    ///
    /// Simultaneous renaming allows swaps such as `x <-> y`.
    pub fn rename_dims(&self, map: &BTreeMap<String, String>) -> Result<Self, DatasetError> {
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|d| map.get(d).cloned().unwrap_or_else(|| d.clone()))
            .collect();
        check_dims(&dims, self.ndim())?;
        Ok(Self {
            dims,
            data: self.data.clone(),
        })
    }

    /// Reorder axes to follow `order`, which must be a permutation of the dims.
    pub fn transpose<S: AsRef<str>>(&self, order: &[S]) -> Result<Self, DatasetError> {
        let (dims, data) = permute(&self.data, &self.dims, order)?;
        Ok(Self { dims, data })
    }

    /// `true` wherever the value is not missing.
    pub fn notnull(&self) -> Mask {
        Mask::from_parts(self.dims.clone(), self.data.mapv(|v| !v.is_nan()))
    }

    /// Apply `f` elementwise.
    pub fn mapv(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            dims: self.dims.clone(),
            data: self.data.mapv(f),
        }
    }

    /// Set values to `NaN` wherever `mask` is `false`.
    ///
    /// The mask's dimensions must be a subset of this array's dimensions;
    /// it is broadcast over the rest.
    pub fn where_mask(&self, mask: &Mask) -> Result<Self, DatasetError> {
        let keep = align(mask.data(), mask.dims(), &self.dims, self.shape())?;
        let data = Zip::from(&self.data)
            .and(&keep)
            .map_collect(|&v, &k| if k { v } else { f64::NAN });
        Ok(Self {
            dims: self.dims.clone(),
            data,
        })
    }

    /// Broadcast this array's data onto `dims` / `shape`.
    pub fn broadcast_to(&self, dims: &[String], shape: &[usize]) -> Result<ArrayD<f64>, DatasetError> {
        align(&self.data, &self.dims, dims, shape)
    }

    /// Combine two arrays elementwise over the union of their dimensions.
    ///
    /// The result carries this array's dimensions first, followed by any of
    /// `other`'s dimensions not already present.
    pub fn zip_with(
        &self,
        other: &DataArray,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Self, DatasetError> {
        let mut dims = self.dims.clone();
        let mut shape = self.shape().to_vec();
        for (d, &n) in other.dims.iter().zip(other.shape()) {
            match self.dims.iter().position(|s| s == d) {
                Some(ax) if shape[ax] != n => {
                    return Err(DatasetError::SizeConflict {
                        dim: d.clone(),
                        expected: shape[ax],
                        got: n,
                    });
                }
                Some(_) => {}
                None => {
                    dims.push(d.clone());
                    shape.push(n);
                }
            }
        }
        let a = align(&self.data, &self.dims, &dims, &shape)?;
        let b = align(&other.data, &other.dims, &dims, &shape)?;
        let data = Zip::from(&a).and(&b).map_collect(|&x, &y| f(x, y));
        Ok(Self { dims, data })
    }

    /// Elementwise product with broadcasting.
    pub fn mul(&self, other: &DataArray) -> Result<Self, DatasetError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Elementwise sum with broadcasting.
    pub fn add(&self, other: &DataArray) -> Result<Self, DatasetError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Elementwise quotient with broadcasting.
    pub fn div(&self, other: &DataArray) -> Result<Self, DatasetError> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Number of missing values.
    pub fn count_missing(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }
}
