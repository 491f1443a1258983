//! Error types for the oemu-vertical crate.

use oemu_dataset::DatasetError;

/// Error type for all fallible operations in the oemu-vertical crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VerticalError {
    /// Returned when variables needed to reconstruct vertical geometry are absent.
    ///
    /// Only the absent names are listed.
    #[error("dataset is missing {missing:?}, required to {purpose}")]
    MissingInputs {
        /// Names that were not found as fields or coordinates.
        missing: Vec<String>,
        /// What the inputs were needed for.
        purpose: String,
    },

    /// Returned when the source bounds describe a different number of cells
    /// than the data's depth dimension.
    #[error("depth dimension '{dim}' has {got} levels but the bounds describe {expected} cells")]
    LevelMismatch {
        /// Depth dimension name.
        dim: String,
        /// Cells described by the bounds.
        expected: usize,
        /// Length of the depth dimension.
        got: usize,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_inputs_lists_only_missing() {
        let err = VerticalError::MissingInputs {
            missing: vec!["zos".into()],
            purpose: "infer vertical cell extent".into(),
        };
        assert_eq!(
            err.to_string(),
            "dataset is missing [\"zos\"], required to infer vertical cell extent"
        );
    }

    #[test]
    fn display_level_mismatch() {
        let err = VerticalError::LevelMismatch {
            dim: "lev".into(),
            expected: 19,
            got: 20,
        };
        assert_eq!(
            err.to_string(),
            "depth dimension 'lev' has 20 levels but the bounds describe 19 cells"
        );
    }

    #[test]
    fn display_invalid_config() {
        let err = VerticalError::InvalidConfig {
            reason: "empty name".into(),
        };
        assert_eq!(err.to_string(), "invalid configuration: empty name");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<VerticalError>();
    }
}
