//! Renaming raw model output to the canonical vocabulary.

use std::collections::BTreeMap;

use oemu_dataset::{Dataset, DatasetError};
use tracing::debug;

/// Renames variables and dimensions of a raw dataset to canonical names
/// (`thetao`, `so`, `uo`, `vo`, `zos`, `x`, `y`, `lev`, `time`, ...).
pub trait Renamer {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    fn rename(&self, ds: &Dataset) -> Result<Dataset, DatasetError>;
}

/// Renames through a fixed alias table; names without an alias are kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AliasRenamer {
    aliases: BTreeMap<String, String>,
}

impl AliasRenamer {
    /// An empty table (renames nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Aliases commonly found in CMIP ocean output.
    pub fn cmip() -> Self {
        [
            ("i", "x"),
            ("nlon", "x"),
            ("xh", "x"),
            ("j", "y"),
            ("nlat", "y"),
            ("yh", "y"),
            ("olevel", "lev"),
            ("deptht", "lev"),
            ("z_l", "lev"),
            ("olevel_bounds", "lev_bounds"),
            ("lev_bnds", "lev_bounds"),
            ("deptht_bounds", "lev_bounds"),
            ("axis_nbounds", "bnds"),
            ("d2", "bnds"),
            ("time_counter", "time"),
            ("longitude", "lon"),
            ("nav_lon", "lon"),
            ("latitude", "lat"),
            ("nav_lat", "lat"),
            ("vertices_longitude", "lon_verticies"),
            ("vertices_latitude", "lat_verticies"),
            ("lon_bnds", "lon_verticies"),
            ("lat_bnds", "lat_verticies"),
            ("nvertex", "vertex"),
            ("vertices", "vertex"),
        ]
        .into_iter()
        .fold(Self::new(), |r, (from, to)| r.with_alias(from, to))
    }

    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }
}

impl Renamer for AliasRenamer {
    fn name(&self) -> &str {
        "alias"
    }

    fn rename(&self, ds: &Dataset) -> Result<Dataset, DatasetError> {
        let sizes = ds.sizes();
        let present: BTreeMap<String, String> = self
            .aliases
            .iter()
            .filter(|(from, _)| ds.variable(from).is_some() || sizes.contains_key(from.as_str()))
            .map(|(f, t)| (f.clone(), t.clone()))
            .collect();
        debug!(renames = ?present, "renaming");
        ds.rename(&present)
    }
}
