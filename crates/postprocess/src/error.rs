//! Error types for the oemu-postprocess crate.

use oemu_dataset::DatasetError;
use oemu_mask::MaskError;

/// Error type for all fallible operations in the oemu-postprocess crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PostprocessError {
    /// Returned when the channel axis length differs from the layout.
    #[error("prediction has {got} channels along '{dim}', layout expects {expected}")]
    ChannelCountMismatch {
        /// Channel dimension name.
        dim: String,
        /// Channels required by the layout.
        expected: usize,
        /// Channels present in the prediction.
        got: usize,
    },

    /// Wrapped error from the mask engine.
    #[error(transparent)]
    Mask(#[from] MaskError),

    /// Wrapped error from the dataset model.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
