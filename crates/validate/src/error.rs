//! Error types for the oemu-validate crate.

use oemu_dataset::{DatasetError, FieldKind};
use oemu_mask::MaskError;

/// Coarse classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A required coordinate, dimension, or attribute is missing or has the wrong shape.
    Schema,
    /// Missing-value patterns disagree across variables, time, or with a wetmask.
    Consistency,
}

/// Error type for all fallible operations in the oemu-validate crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidateError {
    /// Returned when the coordinate names differ from the expected set.
    #[error("expected coordinates {expected:?}: missing {missing:?}, unexpected {unexpected:?}")]
    UnexpectedCoordinates {
        /// The expected coordinate set.
        expected: Vec<String>,
        /// Expected coordinates that are absent.
        missing: Vec<String>,
        /// Present coordinates that are not expected.
        unexpected: Vec<String>,
    },

    /// Returned when a fixed-size dimension is absent.
    #[error("dimension '{dim}' is missing")]
    MissingDimension {
        /// The absent dimension.
        dim: String,
    },

    /// Returned when a prediction carries a dimension the schema does not know.
    #[error("unexpected dimension '{dim}' (size {size})")]
    UnexpectedDimension {
        /// The unexpected dimension.
        dim: String,
        /// Its length.
        size: usize,
    },

    /// Returned when a fixed-size dimension has the wrong length.
    #[error("dimension '{dim}' has size {got}, expected {expected}")]
    DimensionSize {
        /// Offending dimension.
        dim: String,
        /// Size fixed by the schema.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a required attribute is absent.
    #[error("required attribute '{key}' is missing")]
    MissingAttribute {
        /// The absent attribute key.
        key: String,
    },

    /// Returned when a coordinate variable has the wrong dimension set.
    #[error("coordinate '{coord}' has dims {got:?}, expected {expected:?}")]
    CoordinateDims {
        /// Offending coordinate.
        coord: String,
        /// Expected dimension set.
        expected: Vec<String>,
        /// Actual dimensions.
        got: Vec<String>,
    },

    /// Returned when the data variables differ from the expected set.
    #[error("data variables differ from the schema: missing {missing:?}, unexpected {unexpected:?}")]
    MissingVariables {
        /// Expected variables that are absent.
        missing: Vec<String>,
        /// Present variables that are not expected.
        unexpected: Vec<String>,
    },

    /// Returned when dimensions other than time have no coordinate values.
    #[error("found dimensions without coordinates: {dims:?}")]
    DanglingDimensions {
        /// Dimensions lacking a coordinate of the same name.
        dims: Vec<String>,
    },

    /// Returned when prediction and input attributes differ.
    #[error("prediction and input attributes do not match (differing keys: {keys:?})")]
    AttributeMismatch {
        /// Keys present on only one side or with different values.
        keys: Vec<String>,
    },

    /// Returned when variables of one kind have different missing-value
    /// patterns at the first time step.
    #[error(
        "{kind} variables {variables:?} (indices {indices:?}) differ in missing values from '{reference}'"
    )]
    InconsistentVariables {
        /// Field subset being checked.
        kind: FieldKind,
        /// Variable the others are compared against.
        reference: String,
        /// Offending variable names.
        variables: Vec<String>,
        /// Offending positions in the name-ordered subset.
        indices: Vec<usize>,
    },

    /// Returned when missing-value patterns change over time.
    #[error("{kind} variable '{variable}' changes its missing values at time indices {indices:?}")]
    InconsistentTimeSteps {
        /// Field subset being checked.
        kind: FieldKind,
        /// First variable found to change.
        variable: String,
        /// Offending time indices (relative to the first step).
        indices: Vec<usize>,
    },

    /// Returned when a prediction's missing values disagree with the input wetmask.
    #[error("prediction does not match the input wetmask: {0}")]
    MaskMismatch(#[source] MaskError),

    /// Wrapped error from the dataset model.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl ValidateError {
    /// Whether this is a schema or a consistency failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ValidateError::InconsistentVariables { .. }
            | ValidateError::InconsistentTimeSteps { .. }
            | ValidateError::MaskMismatch(_) => ErrorCategory::Consistency,
            _ => ErrorCategory::Schema,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_dimension_size() {
        let err = ValidateError::DimensionSize {
            dim: "x".into(),
            expected: 360,
            got: 359,
        };
        assert_eq!(err.to_string(), "dimension 'x' has size 359, expected 360");
    }

    #[test]
    fn display_inconsistent_variables() {
        let err = ValidateError::InconsistentVariables {
            kind: FieldKind::Volumetric,
            reference: "so".into(),
            variables: vec!["uo".into()],
            indices: vec![2],
        };
        assert_eq!(
            err.to_string(),
            "volumetric variables [\"uo\"] (indices [2]) differ in missing values from 'so'"
        );
    }

    #[test]
    fn display_missing_attribute() {
        let err = ValidateError::MissingAttribute {
            key: "m2lines/ocean-emulators_git_hash".into(),
        };
        assert_eq!(
            err.to_string(),
            "required attribute 'm2lines/ocean-emulators_git_hash' is missing"
        );
    }

    #[test]
    fn categories() {
        assert_eq!(
            ValidateError::MissingDimension { dim: "lev".into() }.category(),
            ErrorCategory::Schema
        );
        let mask = MaskError::Mismatch {
            variable: "zos".into(),
            mismatched: 1,
            total: 4,
        };
        assert_eq!(
            ValidateError::MaskMismatch(mask).category(),
            ErrorCategory::Consistency
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ValidateError>();
    }
}
