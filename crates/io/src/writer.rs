//! High-level NetCDF writer configuration and orchestration.

use std::path::Path;

use oemu_dataset::Dataset;

use crate::error::IoError;

/// Compression applied to every non-scalar variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// zlib deflate at `level` (0-9).
    Deflate {
        /// Deflate level.
        level: u8,
    },
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Deflate { level: 4 }
    }
}

/// Configuration for writing a [`Dataset`] to NetCDF.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Enable the shuffle filter alongside deflate.
    shuffle: bool,
    /// Replace an existing file at the output path.
    overwrite: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            shuffle: true,
            overwrite: false,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Allow replacing an existing output file.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidConfig`] if the deflate level exceeds 9.
    pub fn validate(&self) -> Result<(), IoError> {
        if let Compression::Deflate { level } = self.compression
            && level > 9
        {
            return Err(IoError::InvalidConfig {
                reason: format!("deflate level must be 0..=9, got {level}"),
            });
        }
        Ok(())
    }
}

/// Write `ds` to a NetCDF-4 file at `path`.
///
/// # Errors
///
/// Returns [`IoError::InvalidConfig`] for an invalid configuration,
/// [`IoError::AlreadyExists`] if `path` exists and overwriting is disabled,
/// [`IoError::FeatureDisabled`] without the `netcdf` feature, or
/// [`IoError::Netcdf`] if the library fails.
pub fn write_netcdf(path: &Path, ds: &Dataset, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;
    if !config.overwrite && path.exists() {
        return Err(IoError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    #[cfg(feature = "netcdf")]
    {
        crate::netcdf_write::write_dataset(path, ds, config)
    }

    #[cfg(not(feature = "netcdf"))]
    {
        let _ = ds;
        Err(IoError::FeatureDisabled {
            feature: "netcdf".to_string(),
            operation: "writing NetCDF files".to_string(),
        })
    }
}
