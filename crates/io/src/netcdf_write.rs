//! Low-level NetCDF output helpers.

use std::path::Path;

use oemu_dataset::{DataArray, Dataset};
use tracing::{debug, info};

use crate::error::IoError;
use crate::writer::{Compression, WriterConfig};

fn put_array(
    file: &mut netcdf::FileMut,
    name: &str,
    array: &DataArray,
    config: &WriterConfig,
    coordinates: Option<&str>,
) -> Result<(), IoError> {
    let dims: Vec<&str> = array.dims().iter().map(String::as_str).collect();
    let mut var = file.add_variable::<f64>(name, &dims)?;
    if let Compression::Deflate { level } = config.compression()
        && !dims.is_empty()
    {
        var.set_compression(i32::from(level), config.shuffle())?;
    }
    if let Some(coordinates) = coordinates {
        var.put_attribute("coordinates", coordinates)?;
    }
    let values: Vec<f64> = array.data().iter().copied().collect();
    var.put_values(&values, ..)?;
    debug!(variable = name, dims = ?dims, "wrote variable");
    Ok(())
}

/// Write every coordinate, field and global attribute of `ds` to `path`.
///
/// Fields carry a CF `coordinates` attribute naming the coordinates that are
/// not dimension variables, so the reader classifies them again.
pub(crate) fn write_dataset(path: &Path, ds: &Dataset, config: &WriterConfig) -> Result<(), IoError> {
    let mut file = netcdf::create(path)?;
    let sizes = ds.sizes();
    for (dim, &len) in &sizes {
        file.add_dimension(dim, len)?;
    }

    let auxiliary: Vec<&str> = ds
        .coords()
        .map(|(name, _)| name.as_str())
        .filter(|name| !sizes.contains_key(*name))
        .collect();
    let coordinates = auxiliary.join(" ");
    let coordinates = (!coordinates.is_empty()).then_some(coordinates.as_str());

    for (name, coord) in ds.coords() {
        put_array(&mut file, name, coord, config, None)?;
    }
    for (name, field) in ds.fields() {
        put_array(&mut file, name, field.array(), config, coordinates)?;
    }
    for (key, value) in ds.attrs() {
        file.add_attribute(key, value.as_str())?;
    }

    info!(
        path = %path.display(),
        n_fields = ds.n_fields(),
        n_dims = sizes.len(),
        "wrote NetCDF dataset"
    );
    Ok(())
}
