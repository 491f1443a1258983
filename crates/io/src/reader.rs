//! High-level NetCDF reader configuration and orchestration.

use std::collections::BTreeSet;
use std::path::Path;

use oemu_dataset::Dataset;

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading a NetCDF file into a [`Dataset`].
///
/// By default every numeric variable is loaded; dimension variables and
/// names listed in CF `coordinates` / `bounds` attributes become
/// coordinates, everything else a field. Fill values are masked to `NaN`
/// and packed values unpacked.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Data variables to load (None = all).
    variables: Option<BTreeSet<String>>,
    /// Extra names to classify as coordinates.
    coords: BTreeSet<String>,
    /// Apply `_FillValue`, `missing_value`, `scale_factor` and `add_offset`.
    decode_cf: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            variables: None,
            coords: BTreeSet::new(),
            decode_cf: true,
        }
    }
}

impl ReaderConfig {
    /// Restrict loading to the named data variables.
    pub fn with_variables<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.variables = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Classify the named variables as coordinates even without CF hints.
    pub fn with_coords<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.coords.extend(names.into_iter().map(Into::into));
        self
    }

    /// Enable or disable CF decoding of fill values and packing.
    pub fn with_decode_cf(mut self, decode: bool) -> Self {
        self.decode_cf = decode;
        self
    }

    pub fn variables(&self) -> Option<&BTreeSet<String>> {
        self.variables.as_ref()
    }

    pub fn coords(&self) -> &BTreeSet<String> {
        &self.coords
    }

    pub fn decode_cf(&self) -> bool {
        self.decode_cf
    }

    /// Whether the data variable `name` should be loaded.
    pub(crate) fn wants(&self, name: &str) -> bool {
        self.variables.as_ref().is_none_or(|v| v.contains(name))
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidConfig`] if an explicit variable list is
    /// empty or names a variable also listed as a coordinate.
    pub fn validate(&self) -> Result<(), IoError> {
        if let Some(variables) = &self.variables {
            if variables.is_empty() {
                return Err(IoError::InvalidConfig {
                    reason: "variable list must not be empty".to_string(),
                });
            }
            if let Some(both) = variables.intersection(&self.coords).next() {
                return Err(IoError::InvalidConfig {
                    reason: format!("'{both}' is listed both as a variable and as a coordinate"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// read_netcdf
// ---------------------------------------------------------------------------

/// Read a NetCDF file into a [`Dataset`].
///
/// Global string attributes become dataset attributes; variable attributes
/// are only used for decoding.
///
/// # Errors
///
/// Returns [`IoError::FeatureDisabled`] when built without the `netcdf`
/// feature, [`IoError::FileNotFound`] for a missing path,
/// [`IoError::MissingVariable`] when a requested variable is absent, and
/// [`IoError::Dataset`] when the variables disagree on dimension sizes.
pub fn read_netcdf(path: &Path, config: &ReaderConfig) -> Result<Dataset, IoError> {
    config.validate()?;

    #[cfg(feature = "netcdf")]
    {
        crate::netcdf_read::read_dataset(path, config)
    }

    #[cfg(not(feature = "netcdf"))]
    {
        let _ = path;
        Err(IoError::FeatureDisabled {
            feature: "netcdf".to_string(),
            operation: "reading NetCDF files".to_string(),
        })
    }
}
