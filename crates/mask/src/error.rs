//! Error types for the oemu-mask crate.

use oemu_dataset::DatasetError;

/// Error type for all fallible operations in the oemu-mask crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaskError {
    /// Returned when a field's missing-value pattern differs from the mask.
    #[error(
        "wetmask does not match variable '{variable}': {mismatched} of {total} cells disagree"
    )]
    Mismatch {
        /// Offending variable.
        variable: String,
        /// Number of cells where `notnull` differs from the mask.
        mismatched: usize,
        /// Number of compared cells.
        total: usize,
    },

    /// Returned when a mask dimension dropped during reduction is not constant.
    #[error("mask is not constant along dimension '{dim}' (differs at index {index})")]
    NonConstantReduction {
        /// Dimension being reduced away.
        dim: String,
        /// First index whose slice differs from index 0.
        index: usize,
    },

    /// Returned when a diagnostic is requested on an empty mask.
    #[error("mask has no cells")]
    EmptyMask,

    /// Wrapped error from the dataset model.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
