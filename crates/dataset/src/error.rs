//! Error types for oemu-dataset.

/// Error type for all fallible operations in the oemu-dataset crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// Returned when the number of dimension names differs from the array rank.
    #[error("array has {ndim} axes but {n_dims} dimension names were given: {dims:?}")]
    RankMismatch {
        /// Dimension names supplied.
        dims: Vec<String>,
        /// Number of names supplied.
        n_dims: usize,
        /// Rank of the array.
        ndim: usize,
    },

    /// Returned when a dimension name appears more than once on one array.
    #[error("duplicate dimension '{dim}'")]
    DuplicateDimension {
        /// The repeated dimension name.
        dim: String,
    },

    /// Returned when an operation names a dimension the array does not have.
    #[error("dimension '{dim}' not found (available: {available:?})")]
    MissingDimension {
        /// Requested dimension.
        dim: String,
        /// Dimensions that do exist.
        available: Vec<String>,
    },

    /// Returned when an index lies outside a dimension.
    #[error("index {index} out of bounds for dimension '{dim}' of length {len}")]
    IndexOutOfBounds {
        /// Dimension name.
        dim: String,
        /// Requested index (or range end).
        index: usize,
        /// Length of the dimension.
        len: usize,
    },

    /// Returned when two arrays disagree on the length of a shared dimension.
    #[error("dimension '{dim}' has size {got}, expected {expected}")]
    SizeConflict {
        /// Dimension name.
        dim: String,
        /// Size already established.
        expected: usize,
        /// Conflicting size.
        got: usize,
    },

    /// Returned when an array cannot be broadcast onto a target dimension set.
    #[error("cannot broadcast dims {from:?} onto {to:?}")]
    Broadcast {
        /// Source dimensions.
        from: Vec<String>,
        /// Target dimensions.
        to: Vec<String>,
    },

    /// Returned when a data variable is absent.
    #[error("field '{name}' not found")]
    MissingField {
        /// Name of the missing field.
        name: String,
    },

    /// Returned when a coordinate is absent.
    #[error("coordinate '{name}' not found")]
    MissingCoordinate {
        /// Name of the missing coordinate.
        name: String,
    },

    /// Returned when depth bounds violate monotonicity or finiteness.
    #[error("invalid depth bounds: {reason}")]
    InvalidDepthBounds {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a channel layout is malformed.
    #[error("invalid channel layout: {reason}")]
    InvalidLayout {
        /// Description of the problem.
        reason: String,
    },

    /// Wraps an ndarray shape error.
    #[error("shape error: {reason}")]
    Shape {
        /// Description of the underlying ndarray failure.
        reason: String,
    },
}

impl From<ndarray::ShapeError> for DatasetError {
    fn from(e: ndarray::ShapeError) -> Self {
        DatasetError::Shape {
            reason: e.to_string(),
        }
    }
}
