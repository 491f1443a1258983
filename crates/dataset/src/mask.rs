//! Boolean wet/dry masks with named dimensions.

use ndarray::{ArrayD, IxDyn};

use crate::array::{DataArray, align, axis_position, check_dims, permute, select_index};
use crate::error::DatasetError;

/// A boolean array with named dimensions; `true` marks a wet (ocean) cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    dims: Vec<String>,
    data: ArrayD<bool>,
}

impl Mask {
    /// Create a mask from dimension names and boolean data.
    pub fn new<S: Into<String>>(
        dims: impl IntoIterator<Item = S>,
        data: ArrayD<bool>,
    ) -> Result<Self, DatasetError> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        check_dims(&dims, data.ndim())?;
        Ok(Self { dims, data })
    }

    pub(crate) fn from_parts(dims: Vec<String>, data: ArrayD<bool>) -> Self {
        Self { dims, data }
    }

    /// A mask of the given shape with every cell set to `value`.
    pub fn filled<S: Into<String>>(
        dims: impl IntoIterator<Item = S>,
        shape: &[usize],
        value: bool,
    ) -> Result<Self, DatasetError> {
        Self::new(dims, ArrayD::from_elem(IxDyn(shape), value))
    }

    /// Interpret a numeric array as a mask: non-zero, non-missing is wet.
    pub fn from_array(array: &DataArray) -> Self {
        Self {
            dims: array.dims().to_vec(),
            data: array.data().mapv(|v| v != 0.0 && !v.is_nan()),
        }
    }

    /// Numeric form of the mask (1.0 wet, 0.0 dry).
    pub fn to_array(&self) -> DataArray {
        DataArray::from_parts(
            self.dims.clone(),
            self.data.mapv(|w| if w { 1.0 } else { 0.0 }),
        )
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn data(&self) -> &ArrayD<bool> {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    pub fn axis_of(&self, dim: &str) -> Result<usize, DatasetError> {
        axis_position(&self.dims, dim)
    }

    pub fn len_of(&self, dim: &str) -> Option<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(|ax| self.data.shape()[ax])
    }

    /// Select one index along `dim`; the dimension is dropped.
    pub fn isel(&self, dim: &str, index: usize) -> Result<Self, DatasetError> {
        let (dims, data) = select_index(&self.data, &self.dims, dim, index)?;
        Ok(Self { dims, data })
    }

    /// Reorder axes to follow `order`.
    pub fn transpose<S: AsRef<str>>(&self, order: &[S]) -> Result<Self, DatasetError> {
        let (dims, data) = permute(&self.data, &self.dims, order)?;
        Ok(Self { dims, data })
    }

    /// Broadcast onto `dims` / `shape`.
    pub fn align_to(&self, dims: &[String], shape: &[usize]) -> Result<ArrayD<bool>, DatasetError> {
        align(&self.data, &self.dims, dims, shape)
    }

    /// Number of wet cells.
    pub fn count_wet(&self) -> usize {
        self.data.iter().filter(|&&w| w).count()
    }

    /// Number of dry cells.
    pub fn count_dry(&self) -> usize {
        self.data.len() - self.count_wet()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
