//! The gridded dataset container.

use std::collections::{BTreeMap, BTreeSet};

use crate::array::DataArray;
use crate::error::DatasetError;
use crate::field::{Field, FieldKind};
use crate::mask::Mask;

/// String attributes attached to a dataset.
pub type Attrs = BTreeMap<String, String>;

/// Named fields and coordinates on a shared set of dimensions, plus attributes.
///
/// Every dimension has one length across all variables; insertion enforces
/// this. Storage is ordered by name, so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    fields: BTreeMap<String, Field>,
    coords: BTreeMap<String, DataArray>,
    attrs: Attrs,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    // -- construction -------------------------------------------------------

    /// Builder form of [`insert_field`](Self::insert_field).
    pub fn with_field(mut self, name: impl Into<String>, array: DataArray) -> Result<Self, DatasetError> {
        self.insert_field(name, array)?;
        Ok(self)
    }

    /// Builder form of [`insert_coord`](Self::insert_coord).
    pub fn with_coord(mut self, name: impl Into<String>, array: DataArray) -> Result<Self, DatasetError> {
        self.insert_coord(name, array)?;
        Ok(self)
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a data variable, classifying it as surface or volumetric.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::SizeConflict`] if a dimension's length differs
    /// from the one already used by another variable.
    pub fn insert_field(&mut self, name: impl Into<String>, array: DataArray) -> Result<(), DatasetError> {
        let name = name.into();
        self.check_sizes(&array, Some(&name), None)?;
        self.fields.insert(name, Field::classify(array));
        Ok(())
    }

    /// Insert or replace a coordinate variable.
    pub fn insert_coord(&mut self, name: impl Into<String>, array: DataArray) -> Result<(), DatasetError> {
        let name = name.into();
        self.check_sizes(&array, None, Some(&name))?;
        self.coords.insert(name, array);
        Ok(())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    pub fn set_attrs(&mut self, attrs: Attrs) {
        self.attrs = attrs;
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }

    pub fn remove_coord(&mut self, name: &str) -> Option<DataArray> {
        self.coords.remove(name)
    }

    fn check_sizes(
        &self,
        array: &DataArray,
        skip_field: Option<&str>,
        skip_coord: Option<&str>,
    ) -> Result<(), DatasetError> {
        let existing = self.sizes_excluding(skip_field, skip_coord);
        for (dim, len) in array.sizes() {
            if let Some(&expected) = existing.get(&dim)
                && expected != len
            {
                return Err(DatasetError::SizeConflict {
                    dim,
                    expected,
                    got: len,
                });
            }
        }
        Ok(())
    }

    fn sizes_excluding(&self, skip_field: Option<&str>, skip_coord: Option<&str>) -> BTreeMap<String, usize> {
        let fields = self
            .fields
            .iter()
            .filter(|(n, _)| Some(n.as_str()) != skip_field)
            .map(|(_, f)| f.array());
        let coords = self
            .coords
            .iter()
            .filter(|(n, _)| Some(n.as_str()) != skip_coord)
            .map(|(_, c)| c);
        let mut sizes = BTreeMap::new();
        for a in fields.chain(coords) {
            sizes.extend(a.sizes());
        }
        sizes
    }

    // -- access -------------------------------------------------------------

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// The named field, or [`DatasetError::MissingField`].
    pub fn require_field(&self, name: &str) -> Result<&Field, DatasetError> {
        self.fields.get(name).ok_or_else(|| DatasetError::MissingField {
            name: name.to_string(),
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }

    /// Fields of one dimensionality class, in name order.
    pub fn fields_of_kind(&self, kind: FieldKind) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter().filter(move |(_, f)| f.kind() == kind)
    }

    pub fn field_names(&self) -> BTreeSet<String> {
        self.fields.keys().cloned().collect()
    }

    pub fn n_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn coord(&self, name: &str) -> Option<&DataArray> {
        self.coords.get(name)
    }

    /// The named coordinate, or [`DatasetError::MissingCoordinate`].
    pub fn require_coord(&self, name: &str) -> Result<&DataArray, DatasetError> {
        self.coords.get(name).ok_or_else(|| DatasetError::MissingCoordinate {
            name: name.to_string(),
        })
    }

    pub fn coords(&self) -> impl Iterator<Item = (&String, &DataArray)> {
        self.coords.iter()
    }

    pub fn coord_names(&self) -> BTreeSet<String> {
        self.coords.keys().cloned().collect()
    }

    /// A field or coordinate by name (fields take precedence).
    pub fn variable(&self, name: &str) -> Option<&DataArray> {
        self.fields
            .get(name)
            .map(Field::array)
            .or_else(|| self.coords.get(name))
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Length of every dimension used by any variable.
    pub fn sizes(&self) -> BTreeMap<String, usize> {
        self.sizes_excluding(None, None)
    }

    /// Dimensions used by some variable that have no coordinate of the same name.
    pub fn dims_without_coords(&self) -> BTreeSet<String> {
        self.sizes()
            .into_keys()
            .filter(|d| !self.coords.contains_key(d))
            .collect()
    }

    /// Wet/dry mask from the named coordinate.
    pub fn wetmask(&self, name: &str) -> Result<Mask, DatasetError> {
        Ok(Mask::from_array(self.require_coord(name)?))
    }

    // -- transforms ---------------------------------------------------------

    /// Select index `index` along `dim` in every variable that has it.
    ///
    /// Fails when no variable carries `dim`.
    pub fn isel(&self, dim: &str, index: usize) -> Result<Self, DatasetError> {
        let sizes = self.sizes();
        if !sizes.contains_key(dim) {
            return Err(DatasetError::MissingDimension {
                dim: dim.to_string(),
                available: sizes.into_keys().collect(),
            });
        }
        let mut out = Self {
            fields: BTreeMap::new(),
            coords: BTreeMap::new(),
            attrs: self.attrs.clone(),
        };
        for (name, field) in &self.fields {
            let a = field.array();
            let a = if a.has_dim(dim) { a.isel(dim, index)? } else { a.clone() };
            out.fields.insert(name.clone(), Field::classify(a));
        }
        for (name, coord) in &self.coords {
            let c = if coord.has_dim(dim) {
                coord.isel(dim, index)?
            } else {
                coord.clone()
            };
            out.coords.insert(name.clone(), c);
        }
        Ok(out)
    }

    /// Rename variables and dimensions simultaneously.
    ///
    /// Keys of `map` may name fields, coordinates, or dimensions.
    pub fn rename(&self, map: &BTreeMap<String, String>) -> Result<Self, DatasetError> {
        let new_name = |n: &String| map.get(n).cloned().unwrap_or_else(|| n.clone());
        let mut out = Self::new().with_attrs(self.attrs.clone());
        for (name, coord) in &self.coords {
            out.insert_coord(new_name(name), coord.rename_dims(map)?)?;
        }
        for (name, field) in &self.fields {
            out.insert_field(new_name(name), field.array().rename_dims(map)?)?;
        }
        Ok(out)
    }

    fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Apply `f` to every field; coordinates and attributes are kept.
    pub fn map_fields<E>(
        &self,
        mut f: impl FnMut(&str, &Field) -> Result<DataArray, E>,
    ) -> Result<Self, E>
    where
        E: From<DatasetError>,
    {
        let mut out = Self {
            fields: BTreeMap::new(),
            coords: self.coords.clone(),
            attrs: self.attrs.clone(),
        };
        for (name, field) in &self.fields {
            let mapped = f(name, field)?;
            out.insert_field(name.clone(), mapped)?;
        }
        Ok(out)
    }

    /// A copy with only the fields of `kind` (coordinates and attributes kept).
    pub fn subset(&self, kind: FieldKind) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(_, f)| f.kind() == kind)
                .map(|(n, f)| (n.clone(), f.clone()))
                .collect(),
            coords: self.coords.clone(),
            attrs: self.attrs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new()
            .with_field(
                "thetao",
                DataArray::filled(["time", "lev", "y", "x"], &[2, 3, 4, 5], 1.0).unwrap(),
            )
            .unwrap()
            .with_field("zos", DataArray::filled(["time", "y", "x"], &[2, 4, 5], 0.5).unwrap())
            .unwrap()
            .with_coord("lev", DataArray::from_vec("lev", vec![5.0, 15.0, 25.0]))
            .unwrap()
            .with_attr("title", "sample")
    }

    #[test]
    fn fields_are_classified() {
        let ds = sample();
        assert_eq!(ds.require_field("thetao").unwrap().kind(), FieldKind::Volumetric);
        assert_eq!(ds.require_field("zos").unwrap().kind(), FieldKind::Surface);
        assert_eq!(ds.fields_of_kind(FieldKind::Surface).count(), 1);
    }

    #[test]
    fn size_conflict_on_insert() {
        let mut ds = sample();
        let err = ds
            .insert_field("so", DataArray::filled(["x"], &[6], 0.0).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::SizeConflict {
                dim: "x".into(),
                expected: 5,
                got: 6
            }
        );
    }

    #[test]
    fn replacing_sole_user_of_dim_may_resize() {
        let mut ds = Dataset::new()
            .with_field("a", DataArray::filled(["x"], &[3], 0.0).unwrap())
            .unwrap();
        ds.insert_field("a", DataArray::filled(["x"], &[4], 0.0).unwrap())
            .unwrap();
        assert_eq!(ds.sizes()["x"], 4);
    }

    #[test]
    fn sizes_and_dangling_dims() {
        let ds = sample();
        let sizes = ds.sizes();
        assert_eq!(sizes["time"], 2);
        assert_eq!(sizes["lev"], 3);
        let dangling = ds.dims_without_coords();
        assert!(dangling.contains("x"));
        assert!(!dangling.contains("lev"));
    }

    #[test]
    fn isel_drops_time() {
        let ds = sample().isel("time", 1).unwrap();
        assert!(!ds.sizes().contains_key("time"));
        assert_eq!(ds.attr("title"), Some("sample"));
        assert!(matches!(
            ds.isel("time", 0),
            Err(DatasetError::MissingDimension { dim, available })
                if dim == "time" && available.contains(&"x".to_string())
        ));
    }

    #[test]
    fn rename_fields_and_dims() {
        let map = BTreeMap::from([
            ("thetao".to_string(), "temp".to_string()),
            ("lev".to_string(), "depth".to_string()),
        ]);
        let ds = sample().rename(&map).unwrap();
        assert!(ds.field("temp").is_some());
        assert!(ds.coord("depth").is_some());
        // no lev left, so the renamed field reclassifies as surface
        assert_eq!(ds.require_field("temp").unwrap().kind(), FieldKind::Surface);
    }

    #[test]
    fn map_fields_keeps_coords() {
        let ds = sample();
        let doubled = ds
            .map_fields::<DatasetError>(|_, f| Ok(f.array().mapv(|v| v * 2.0)))
            .unwrap();
        assert_eq!(doubled.coord_names(), ds.coord_names());
        let z = doubled.require_field("zos").unwrap().array();
        assert!(z.data().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn variable_prefers_fields() {
        let ds = sample();
        assert!(ds.variable("zos").is_some());
        assert!(ds.variable("lev").is_some());
        assert!(ds.variable("nope").is_none());
        assert!(matches!(
            ds.require_coord("nope"),
            Err(DatasetError::MissingCoordinate { .. })
        ));
    }
}
