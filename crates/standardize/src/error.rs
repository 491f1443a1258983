//! Error types for the oemu-standardize crate.

use oemu_dataset::DatasetError;
use oemu_horizontal::HorizontalError;
use oemu_mask::MaskError;
use oemu_validate::ValidateError;
use oemu_vertical::VerticalError;

/// Error type for all fallible operations in the oemu-standardize crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StandardizeError {
    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the renaming step fails.
    #[error("renaming with '{renamer}' failed: {source}")]
    Rename {
        /// Name of the renamer.
        renamer: String,
        /// Underlying failure.
        #[source]
        source: DatasetError,
    },

    /// Wrapped error from the vertical regridder.
    #[error(transparent)]
    Vertical(#[from] VerticalError),

    /// Wrapped error from the horizontal regridder.
    #[error(transparent)]
    Horizontal(#[from] HorizontalError),

    /// Wrapped error from the mask engine.
    #[error(transparent)]
    Mask(#[from] MaskError),

    /// Wrapped error from validation of the standardized output.
    #[error(transparent)]
    Validate(#[from] ValidateError),

    /// Wrapped error from the dataset model.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
