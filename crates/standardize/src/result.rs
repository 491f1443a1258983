//! Result types for the standardization pipeline.

use oemu_dataset::Dataset;

/// Records which pipeline steps were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepsApplied {
    /// Whether the renamer ran.
    pub renamed: bool,
    /// Whether z* cell thickness was recomputed.
    pub cell_extent: bool,
    /// Whether vertical regridding ran.
    pub vertical: bool,
    /// Whether horizontal regridding ran.
    pub horizontal: bool,
    /// Whether a wetmask was derived and applied.
    pub wetmask: bool,
    /// Whether the provenance attribute was written.
    pub provenance: bool,
    /// Whether the shallow check ran (and passed).
    pub shallow_check: bool,
}

/// Output of [`standardize_dataset`](crate::standardize_dataset).
#[derive(Debug, Clone)]
pub struct StandardizeResult {
    dataset: Dataset,
    steps: StepsApplied,
    /// Land fraction of the wetmask's top level, when one was derived.
    land_fraction: Option<f64>,
}

impl StandardizeResult {
    pub fn new(dataset: Dataset, steps: StepsApplied, land_fraction: Option<f64>) -> Self {
        Self {
            dataset,
            steps,
            land_fraction,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Consumes self and returns the standardized dataset.
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn steps(&self) -> &StepsApplied {
        &self.steps
    }

    pub fn land_fraction(&self) -> Option<f64> {
        self.land_fraction
    }
}
