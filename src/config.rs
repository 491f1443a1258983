use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

/// Top-level oemu configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OemuConfig {
    /// Expected structure of standardized data.
    #[serde(default)]
    pub schema: SchemaToml,

    /// Vertical regridding settings.
    #[serde(default)]
    pub vertical: VerticalToml,

    /// Horizontal regridding settings.
    #[serde(default)]
    pub horizontal: HorizontalToml,

    /// Pipeline settings.
    #[serde(default)]
    pub standardize: StandardizeToml,

    /// NetCDF settings.
    #[serde(default)]
    pub io: IoToml,
}

impl OemuConfig {
    /// Parse the TOML file at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaToml {
    #[serde(default = "default_nx")]
    pub x: usize,
    #[serde(default = "default_ny")]
    pub y: usize,
    #[serde(default = "default_nlev")]
    pub lev: usize,
    #[serde(default = "default_volumetric")]
    pub volumetric: Vec<String>,
    #[serde(default = "default_surface")]
    pub surface: Vec<String>,
    /// Replaces the canonical coordinate set when given.
    #[serde(default)]
    pub coords: Option<Vec<String>>,
    /// Exact set of data variables expected, if any.
    #[serde(default)]
    pub data_vars: Option<Vec<String>>,
    #[serde(default)]
    pub provenance_attr: Option<String>,
}

impl Default for SchemaToml {
    fn default() -> Self {
        Self {
            x: default_nx(),
            y: default_ny(),
            lev: default_nlev(),
            volumetric: default_volumetric(),
            surface: default_surface(),
            coords: None,
            data_vars: None,
            provenance_attr: None,
        }
    }
}

fn default_nx() -> usize {
    360
}
fn default_ny() -> usize {
    180
}
fn default_nlev() -> usize {
    19
}
fn default_volumetric() -> Vec<String> {
    ["uo", "vo", "thetao", "so"].map(String::from).to_vec()
}
fn default_surface() -> Vec<String> {
    vec!["zos".to_string()]
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerticalToml {
    /// Regrid vertically at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Target depth bounds in meters (canonical 19 levels if absent).
    #[serde(default)]
    pub bounds: Option<Vec<f64>>,
    #[serde(default = "default_lev_dim")]
    pub lev_dim: String,
    #[serde(default = "default_bounds_coord")]
    pub bounds_coord: String,
    #[serde(default = "default_bounds_dim")]
    pub bounds_dim: String,
    #[serde(default = "default_thickness_coord")]
    pub thickness_coord: String,
}

impl Default for VerticalToml {
    fn default() -> Self {
        Self {
            enabled: true,
            bounds: None,
            lev_dim: default_lev_dim(),
            bounds_coord: default_bounds_coord(),
            bounds_dim: default_bounds_dim(),
            thickness_coord: default_thickness_coord(),
        }
    }
}

fn default_lev_dim() -> String {
    "lev".to_string()
}
fn default_bounds_coord() -> String {
    "lev_bounds".to_string()
}
fn default_bounds_dim() -> String {
    "bnds".to_string()
}
fn default_thickness_coord() -> String {
    "dz".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HorizontalToml {
    #[serde(default = "default_method")]
    pub method: String,
    /// Verify vertex ordering on a small patch of both grids.
    #[serde(default)]
    pub check: bool,
    #[serde(default = "default_true")]
    pub periodic: bool,
    #[serde(default)]
    pub ignore_degenerate: bool,
    #[serde(default = "default_true")]
    pub unmapped_to_nan: bool,
    /// Corner order of the cell bounds: "counterclockwise", "clockwise", or auto-detect.
    #[serde(default)]
    pub corner_order: Option<String>,
}

impl Default for HorizontalToml {
    fn default() -> Self {
        Self {
            method: default_method(),
            check: false,
            periodic: true,
            ignore_degenerate: false,
            unmapped_to_nan: true,
            corner_order: None,
        }
    }
}

fn default_method() -> String {
    "conservative".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardizeToml {
    /// "cmip" for the built-in alias table, "none" to keep names.
    #[serde(default = "default_renamer")]
    pub renamer: String,
    /// Extra `from = "to"` renames on top of the table.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub infer_cell_extent: bool,
    #[serde(default = "default_wetmask_tracer")]
    pub wetmask_tracer: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default = "default_true")]
    pub shallow_check: bool,
}

impl Default for StandardizeToml {
    fn default() -> Self {
        Self {
            renamer: default_renamer(),
            aliases: BTreeMap::new(),
            infer_cell_extent: false,
            wetmask_tracer: default_wetmask_tracer(),
            revision: None,
            shallow_check: true,
        }
    }
}

fn default_renamer() -> String {
    "cmip".to_string()
}
fn default_wetmask_tracer() -> Option<String> {
    Some("thetao".to_string())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_deflate_level")]
    pub deflate_level: u8,
    /// Variables to treat as coordinates when reading.
    #[serde(default)]
    pub coords: Vec<String>,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            deflate_level: default_deflate_level(),
            coords: Vec::new(),
        }
    }
}

fn default_compression() -> String {
    "deflate".to_string()
}
fn default_deflate_level() -> u8 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: OemuConfig = toml::from_str("").unwrap();
        assert_eq!(config.schema.x, 360);
        assert_eq!(config.schema.volumetric, ["uo", "vo", "thetao", "so"]);
        assert!(config.vertical.enabled);
        assert_eq!(config.horizontal.method, "conservative");
        assert_eq!(config.standardize.wetmask_tracer.as_deref(), Some("thetao"));
        assert_eq!(config.io.deflate_level, 4);
    }

    #[test]
    fn sections_parse() {
        let config: OemuConfig = toml::from_str(
            r#"
            [schema]
            x = 4
            y = 3
            lev = 2
            volumetric = ["thetao"]

            [vertical]
            bounds = [0.0, 10.0, 20.0]

            [horizontal]
            method = "conservative_normed"
            check = true

            [standardize]
            renamer = "none"
            aliases = { votemper = "thetao" }
            revision = "abc123"
            "#,
        )
        .unwrap();
        assert_eq!(config.schema.lev, 2);
        assert_eq!(config.vertical.bounds.as_deref(), Some(&[0.0, 10.0, 20.0][..]));
        assert!(config.horizontal.check);
        assert_eq!(config.standardize.aliases["votemper"], "thetao");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<OemuConfig, _> = toml::from_str("[vertical]\nlevels = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = OemuConfig::load(Path::new("/nonexistent/oemu.toml")).unwrap();
        assert_eq!(config.schema.y, 180);
    }
}
