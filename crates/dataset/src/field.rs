//! Tagged surface / volumetric fields.

use std::fmt;

use crate::array::DataArray;
use crate::dims;

/// Dimensionality class of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// No depth dimension (dims within `{x, y, time}`).
    Surface,
    /// Carries the depth dimension.
    Volumetric,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Surface => "surface",
            FieldKind::Volumetric => "volumetric",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A data variable, classified once on insertion by the presence of `lev`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Surface(DataArray),
    Volumetric(DataArray),
}

impl Field {
    /// Classify an array by whether it has the depth dimension.
    pub fn classify(array: DataArray) -> Self {
        if array.has_dim(dims::LEV) {
            Field::Volumetric(array)
        } else {
            Field::Surface(array)
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Surface(_) => FieldKind::Surface,
            Field::Volumetric(_) => FieldKind::Volumetric,
        }
    }

    pub fn array(&self) -> &DataArray {
        match self {
            Field::Surface(a) | Field::Volumetric(a) => a,
        }
    }

    pub fn into_array(self) -> DataArray {
        match self {
            Field::Surface(a) | Field::Volumetric(a) => a,
        }
    }

    pub fn is_volumetric(&self) -> bool {
        matches!(self, Field::Volumetric(_))
    }
}
