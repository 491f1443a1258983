//! Injectable canonical schema and channel layout.
//!
//! The canonical values (360x180 horizontal grid, 19 depth levels, a
//! 77-channel flat model output) are defaults, not literals scattered through
//! the pipeline: every consumer receives a [`Schema`] and reads them from it.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::dims;
use crate::error::DatasetError;
use crate::field::FieldKind;

/// Attribute key carrying the software revision that produced a dataset.
pub const PROVENANCE_ATTR: &str = "m2lines/ocean-emulators_git_hash";

/// Variable name used for an unnamed flat array on disk.
pub const FLAT_VARIABLE: &str = "__xarray_dataarray_variable__";

/// Name of the wet/dry mask coordinate.
pub const WETMASK: &str = "wetmask";

// ---------------------------------------------------------------------------
// ChannelLayout
// ---------------------------------------------------------------------------

/// One contiguous block of the flat channel axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSegment {
    /// Variable name.
    pub name: String,
    /// Surface (one channel) or volumetric (one channel per level).
    pub kind: FieldKind,
    /// Channel indices covered by this variable.
    pub channels: Range<usize>,
}

/// Maps the flat channel axis of a model output onto named variables.
///
/// Volumetric variables come first, each occupying `n_levels` consecutive
/// channels (level 0 first), followed by one channel per surface variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelLayout {
    volumetric: Vec<String>,
    n_levels: usize,
    surface: Vec<String>,
    channel_dim: String,
    variable: String,
}

impl ChannelLayout {
    pub fn new<S: Into<String>>(
        volumetric: impl IntoIterator<Item = S>,
        n_levels: usize,
        surface: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            volumetric: volumetric.into_iter().map(Into::into).collect(),
            n_levels,
            surface: surface.into_iter().map(Into::into).collect(),
            channel_dim: dims::CHANNEL.to_string(),
            variable: FLAT_VARIABLE.to_string(),
        }
    }

    /// `uo, vo, thetao, so` on 19 levels followed by `zos`.
    pub fn canonical() -> Self {
        Self::new(["uo", "vo", "thetao", "so"], 19, ["zos"])
    }

    pub fn with_channel_dim(mut self, dim: impl Into<String>) -> Self {
        self.channel_dim = dim.into();
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    pub fn volumetric(&self) -> &[String] {
        &self.volumetric
    }

    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    pub fn surface(&self) -> &[String] {
        &self.surface
    }

    pub fn channel_dim(&self) -> &str {
        &self.channel_dim
    }

    /// Name of the flat array variable in a raw prediction dataset.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Total channel count (`volumetric * n_levels + surface`).
    pub fn n_channels(&self) -> usize {
        self.volumetric.len() * self.n_levels + self.surface.len()
    }

    /// All variable names in channel order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.volumetric
            .iter()
            .chain(self.surface.iter())
            .map(String::as_str)
            .collect()
    }

    /// Channel blocks in order.
    pub fn segments(&self) -> Vec<ChannelSegment> {
        let mut out = Vec::with_capacity(self.volumetric.len() + self.surface.len());
        let mut start = 0;
        for name in &self.volumetric {
            out.push(ChannelSegment {
                name: name.clone(),
                kind: FieldKind::Volumetric,
                channels: start..start + self.n_levels,
            });
            start += self.n_levels;
        }
        for name in &self.surface {
            out.push(ChannelSegment {
                name: name.clone(),
                kind: FieldKind::Surface,
                channels: start..start + 1,
            });
            start += 1;
        }
        out
    }

    /// Check the layout is usable.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.volumetric.is_empty() && self.surface.is_empty() {
            return Err(DatasetError::InvalidLayout {
                reason: "layout names no variables".to_string(),
            });
        }
        if !self.volumetric.is_empty() && self.n_levels == 0 {
            return Err(DatasetError::InvalidLayout {
                reason: "n_levels must be > 0".to_string(),
            });
        }
        let mut seen = BTreeSet::new();
        for name in self.volumetric.iter().chain(self.surface.iter()) {
            if !seen.insert(name.as_str()) {
                return Err(DatasetError::InvalidLayout {
                    reason: format!("variable '{name}' listed twice"),
                });
            }
        }
        if self.channel_dim.is_empty() {
            return Err(DatasetError::InvalidLayout {
                reason: "channel dimension name is empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ChannelLayout {
    fn default() -> Self {
        Self::canonical()
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Structural expectations for a standardized dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    coords: BTreeSet<String>,
    sizes: BTreeMap<String, usize>,
    provenance_attr: String,
    coord_dims: BTreeMap<String, BTreeSet<String>>,
    data_vars: Option<BTreeSet<String>>,
    layout: ChannelLayout,
    time_dim: String,
    wetmask: String,
}

fn set_of<S: Into<String>>(items: impl IntoIterator<Item = S>) -> BTreeSet<String> {
    items.into_iter().map(Into::into).collect()
}

impl Schema {
    /// The canonical 1-degree, 19-level schema.
    pub fn canonical() -> Self {
        let coord_dims = BTreeMap::from([
            (WETMASK.to_string(), set_of([dims::X, dims::Y, dims::LEV])),
            ("areacello".to_string(), set_of([dims::X, dims::Y])),
            ("lon".to_string(), set_of([dims::X, dims::Y])),
            ("lat".to_string(), set_of([dims::X, dims::Y])),
            ("dz".to_string(), set_of([dims::LEV])),
        ]);
        Self {
            coords: set_of([
                "areacello",
                "dz",
                dims::X,
                dims::Y,
                dims::TIME,
                dims::LEV,
                "lon",
                "lat",
                WETMASK,
            ]),
            sizes: BTreeMap::from([
                (dims::X.to_string(), 360),
                (dims::Y.to_string(), 180),
                (dims::LEV.to_string(), 19),
            ]),
            provenance_attr: PROVENANCE_ATTR.to_string(),
            coord_dims,
            data_vars: None,
            layout: ChannelLayout::canonical(),
            time_dim: dims::TIME.to_string(),
            wetmask: WETMASK.to_string(),
        }
    }

    /// Replace the expected coordinate set.
    pub fn with_coords<S: Into<String>>(mut self, coords: impl IntoIterator<Item = S>) -> Self {
        self.coords = set_of(coords);
        self
    }

    /// Set (or add) a fixed dimension size.
    pub fn with_size(mut self, dim: impl Into<String>, size: usize) -> Self {
        self.sizes.insert(dim.into(), size);
        self
    }

    /// Replace every fixed dimension size.
    pub fn with_sizes(mut self, sizes: BTreeMap<String, usize>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_provenance_attr(mut self, key: impl Into<String>) -> Self {
        self.provenance_attr = key.into();
        self
    }

    /// Expected dimension set of one coordinate variable.
    pub fn with_coord_dims<S: Into<String>>(
        mut self,
        coord: impl Into<String>,
        dims: impl IntoIterator<Item = S>,
    ) -> Self {
        self.coord_dims.insert(coord.into(), set_of(dims));
        self
    }

    /// Require exactly this set of data variables.
    pub fn with_data_vars<S: Into<String>>(mut self, vars: impl IntoIterator<Item = S>) -> Self {
        self.data_vars = Some(set_of(vars));
        self
    }

    pub fn with_layout(mut self, layout: ChannelLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_time_dim(mut self, dim: impl Into<String>) -> Self {
        self.time_dim = dim.into();
        self
    }

    pub fn with_wetmask(mut self, name: impl Into<String>) -> Self {
        self.wetmask = name.into();
        self
    }

    pub fn coords(&self) -> &BTreeSet<String> {
        &self.coords
    }

    pub fn sizes(&self) -> &BTreeMap<String, usize> {
        &self.sizes
    }

    /// Expected length of `dim`, if fixed.
    pub fn size_of(&self, dim: &str) -> Option<usize> {
        self.sizes.get(dim).copied()
    }

    pub fn provenance_attr(&self) -> &str {
        &self.provenance_attr
    }

    pub fn coord_dims(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.coord_dims
    }

    pub fn data_vars(&self) -> Option<&BTreeSet<String>> {
        self.data_vars.as_ref()
    }

    pub fn layout(&self) -> &ChannelLayout {
        &self.layout
    }

    pub fn time_dim(&self) -> &str {
        &self.time_dim
    }

    pub fn wetmask(&self) -> &str {
        &self.wetmask
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), DatasetError> {
        self.layout.validate()?;
        if let Some(&n) = self.sizes.get(dims::LEV)
            && !self.layout.volumetric().is_empty()
            && n != self.layout.n_levels()
        {
            return Err(DatasetError::InvalidLayout {
                reason: format!(
                    "layout has {} levels but schema fixes lev={n}",
                    self.layout.n_levels()
                ),
            });
        }
        if self.sizes.contains_key(&self.time_dim) {
            return Err(DatasetError::InvalidLayout {
                reason: format!("time dimension '{}' must not have a fixed size", self.time_dim),
            });
        }
        Ok(())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::canonical()
    }
}
