//! # oemu-io
//!
//! Read and write [`oemu_dataset::Dataset`]s as NetCDF files and persist
//! validation outcomes as JSON. NetCDF support links the system libnetcdf
//! and sits behind the `netcdf` feature; without it the readers and writers
//! return [`IoError::FeatureDisabled`].

mod error;
#[cfg(feature = "netcdf")]
mod netcdf_read;
#[cfg(feature = "netcdf")]
mod netcdf_write;
mod reader;
mod report;
mod writer;

pub use error::IoError;
pub use reader::{ReaderConfig, read_netcdf};
pub use report::ValidationReport;
pub use writer::{Compression, WriterConfig, write_netcdf};
