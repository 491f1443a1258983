//! Low-level NetCDF extraction helpers.

use std::collections::BTreeSet;
use std::path::Path;

use netcdf::AttributeValue;
use oemu_dataset::{DataArray, Dataset};
use tracing::{debug, info};

use crate::error::IoError;
use crate::reader::ReaderConfig;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a string attribute of `var`, if present and textual.
fn attr_str(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Read a numeric scalar attribute of `var` as `f64`.
fn attr_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&f| f64::from(f)),
        _ => None,
    }
}

/// Names that are coordinates rather than data variables: dimension
/// variables, names listed in `coordinates` / `bounds` attributes, and the
/// configured extras.
pub(crate) fn coordinate_names(file: &netcdf::File, config: &ReaderConfig) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = file.dimensions().map(|d| d.name()).collect();
    for var in file.variables() {
        if let Some(listed) = attr_str(&var, "coordinates") {
            names.extend(listed.split_whitespace().map(str::to_string));
        }
        if let Some(bounds) = attr_str(&var, "bounds") {
            names.insert(bounds);
        }
    }
    names.extend(config.coords().iter().cloned());
    names
}

/// Mask fill values and unpack `scale_factor` / `add_offset` in place.
fn decode_cf(var: &netcdf::Variable<'_>, values: &mut [f64]) {
    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .into_iter()
        .filter_map(|name| attr_f64(var, name))
        .collect();
    let scale = attr_f64(var, "scale_factor").unwrap_or(1.0);
    let offset = attr_f64(var, "add_offset").unwrap_or(0.0);
    for v in values.iter_mut() {
        *v = if fills.contains(v) { f64::NAN } else { *v * scale + offset };
    }
}

/// Read a numeric variable as a [`DataArray`]; non-numeric variables are
/// skipped.
fn read_array(var: &netcdf::Variable<'_>, config: &ReaderConfig) -> Result<Option<DataArray>, IoError> {
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let mut values = match var.get_values::<f64, _>(..) {
        Ok(values) => values,
        Err(e) => {
            debug!(variable = %var.name(), error = %e, "skipping non-numeric variable");
            return Ok(None);
        }
    };
    if config.decode_cf() {
        decode_cf(var, &mut values);
    }
    Ok(Some(DataArray::from_shape_vec(dims, &shape, values)?))
}

/// Load `path` into a [`Dataset`].
pub(crate) fn read_dataset(path: &Path, config: &ReaderConfig) -> Result<Dataset, IoError> {
    let file = open_file(path)?;
    let coord_names = coordinate_names(&file, config);

    let mut ds = Dataset::new();
    for var in file.variables() {
        let name = var.name();
        let is_coord = coord_names.contains(&name);
        if !is_coord && !config.wants(&name) {
            debug!(variable = %name, "not requested");
            continue;
        }
        let Some(array) = read_array(&var, config)? else {
            continue;
        };
        if is_coord {
            ds.insert_coord(name, array)?;
        } else {
            ds.insert_field(name, array)?;
        }
    }

    for attr in file.attributes() {
        match attr.value()? {
            AttributeValue::Str(value) => ds.set_attr(attr.name(), value),
            _ => debug!(attribute = attr.name(), "skipping non-string global attribute"),
        }
    }

    if let Some(wanted) = config.variables()
        && let Some(missing) = wanted.iter().find(|name| ds.field(name).is_none())
    {
        return Err(IoError::MissingVariable {
            name: missing.clone(),
            path: path.to_path_buf(),
        });
    }

    info!(
        path = %path.display(),
        n_fields = ds.n_fields(),
        n_coords = ds.coord_names().len(),
        "read NetCDF dataset"
    );
    Ok(ds)
}
