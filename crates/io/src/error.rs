//! Error types for oemu-io.

use std::path::PathBuf;

use oemu_dataset::DatasetError;

/// Error type for all fallible operations in the oemu-io crate.
///
/// Covers filesystem failures, NetCDF and JSON format errors, and datasets
/// read from disk that do not form a consistent [`oemu_dataset::Dataset`].
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when the output file exists and overwriting is disabled.
    #[error("refusing to overwrite existing file {}", path.display())]
    AlreadyExists {
        /// Path of the existing file.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps a JSON serialization failure.
    #[error("json error: {reason}")]
    Json {
        /// Description of the underlying serde_json failure.
        reason: String,
    },

    /// Wraps a filesystem failure.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a requested variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when an operation needs a Cargo feature that was not compiled in.
    #[error("{operation} requires the '{feature}' feature; rebuild with `--features {feature}`")]
    FeatureDisabled {
        /// Name of the missing Cargo feature.
        feature: String,
        /// What was attempted.
        operation: String,
    },

    /// Wrapped error from the dataset model.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.nc");
    }

    #[test]
    fn display_already_exists() {
        let err = IoError::AlreadyExists {
            path: PathBuf::from("/data/out.nc"),
        };
        assert_eq!(err.to_string(), "refusing to overwrite existing file /data/out.nc");
    }

    #[test]
    fn display_netcdf() {
        let err = IoError::Netcdf {
            reason: "bad header".to_string(),
        };
        assert_eq!(err.to_string(), "netcdf error: bad header");
    }

    #[test]
    fn display_missing_variable() {
        let err = IoError::MissingVariable {
            name: "thetao".to_string(),
            path: PathBuf::from("/data/raw.nc"),
        };
        assert_eq!(err.to_string(), "variable 'thetao' not found in /data/raw.nc");
    }

    #[test]
    fn display_feature_disabled() {
        let err = IoError::FeatureDisabled {
            feature: "netcdf".to_string(),
            operation: "reading NetCDF files".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "reading NetCDF files requires the 'netcdf' feature; rebuild with `--features netcdf`"
        );
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: IoError = json_err.into();
        assert!(matches!(err, IoError::Json { .. }));
    }

    #[cfg(feature = "netcdf")]
    #[test]
    fn from_netcdf_error() {
        let nc_err = netcdf::Error::Str("test nc error".to_string());
        let err: IoError = nc_err.into();
        assert!(matches!(err, IoError::Netcdf { .. }));
        assert!(err.to_string().contains("test nc error"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
