//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use oemu_dataset::{ChannelLayout, DepthBounds, Schema};
use oemu_horizontal::{CornerOrder, RegridConfig, RegridMethod};
use oemu_io::{Compression, ReaderConfig, WriterConfig};
use oemu_standardize::{AliasRenamer, StandardizeConfig};
use oemu_vertical::{VerticalConfig, canonical_depth_bounds};

/// Parses a corner order name into the corresponding enum variant.
pub fn parse_corner_order(s: &str) -> Result<CornerOrder> {
    match s.to_lowercase().as_str() {
        "counterclockwise" | "ccw" => Ok(CornerOrder::Counterclockwise),
        "clockwise" | "cw" => Ok(CornerOrder::Clockwise),
        other => bail!("unknown corner order: {other:?}"),
    }
}

/// Parses a compression name and level into the corresponding enum variant.
pub fn parse_compression(s: &str, level: u8) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "deflate" | "zlib" => Ok(Compression::Deflate { level }),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Builds the [`Schema`] from the TOML schema section.
pub fn build_schema(schema: &SchemaToml) -> Result<Schema> {
    let layout = ChannelLayout::new(schema.volumetric.clone(), schema.lev, schema.surface.clone());
    let mut out = Schema::canonical()
        .with_size("x", schema.x)
        .with_size("y", schema.y)
        .with_size("lev", schema.lev)
        .with_layout(layout);
    if let Some(coords) = &schema.coords {
        out = out.with_coords(coords.clone());
    }
    if let Some(vars) = &schema.data_vars {
        out = out.with_data_vars(vars.clone());
    }
    if let Some(key) = &schema.provenance_attr {
        out = out.with_provenance_attr(key);
    }
    out.validate().context("invalid [schema]")?;
    Ok(out)
}

/// Builds a [`VerticalConfig`] from the TOML vertical section.
pub fn build_vertical_config(vertical: &VerticalToml) -> VerticalConfig {
    VerticalConfig::new()
        .with_lev_dim(&vertical.lev_dim)
        .with_bounds_coord(&vertical.bounds_coord)
        .with_bounds_dim(&vertical.bounds_dim)
        .with_thickness_coord(&vertical.thickness_coord)
}

/// Target depth bounds, or `None` when vertical regridding is disabled.
pub fn build_vertical_target(vertical: &VerticalToml) -> Result<Option<DepthBounds>> {
    if !vertical.enabled {
        return Ok(None);
    }
    let bounds = match &vertical.bounds {
        Some(edges) => DepthBounds::new(edges.clone()),
        None => canonical_depth_bounds(),
    }
    .context("invalid [vertical].bounds")?;
    Ok(Some(bounds))
}

/// Builds a [`RegridConfig`] from the TOML horizontal section.
pub fn build_regrid_config(horizontal: &HorizontalToml) -> Result<RegridConfig> {
    let method: RegridMethod = horizontal.method.parse()?;
    let corner_order = horizontal
        .corner_order
        .as_deref()
        .map(parse_corner_order)
        .transpose()?;
    Ok(RegridConfig::new()
        .with_method(method)
        .with_check(horizontal.check)
        .with_periodic(horizontal.periodic)
        .with_ignore_degenerate(horizontal.ignore_degenerate)
        .with_unmapped_to_nan(horizontal.unmapped_to_nan)
        .with_corner_order(corner_order))
}

/// Builds the renamer named in the TOML standardize section.
pub fn build_renamer(standardize: &StandardizeToml) -> Result<AliasRenamer> {
    let base = match standardize.renamer.to_lowercase().as_str() {
        "cmip" => AliasRenamer::cmip(),
        "none" => AliasRenamer::new(),
        other => bail!("unknown renamer: {other:?}"),
    };
    Ok(standardize
        .aliases
        .iter()
        .fold(base, |r, (from, to)| r.with_alias(from, to)))
}

/// Builds the pipeline [`StandardizeConfig`] from every section.
pub fn build_standardize_config(config: &OemuConfig) -> Result<StandardizeConfig> {
    let s = &config.standardize;
    let mut cfg = StandardizeConfig::new()
        .with_schema(build_schema(&config.schema)?)
        .with_infer_cell_extent(s.infer_cell_extent)
        .with_vertical(build_vertical_config(&config.vertical))
        .with_vertical_target(build_vertical_target(&config.vertical)?)
        .with_horizontal(build_regrid_config(&config.horizontal)?)
        .with_wetmask_tracer(s.wetmask_tracer.clone())
        .with_shallow_check(s.shallow_check);
    if let Some(revision) = &s.revision {
        cfg = cfg.with_revision(revision);
    }
    cfg.validate().context("invalid standardization config")?;
    Ok(cfg)
}

/// Builds a [`ReaderConfig`] from the TOML I/O section.
pub fn build_reader_config(io: &IoToml) -> ReaderConfig {
    ReaderConfig::default().with_coords(io.coords.iter().cloned())
}

/// Builds a [`WriterConfig`] from the TOML I/O section.
pub fn build_writer_config(io: &IoToml, overwrite: bool) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression, io.deflate_level)?;
    let cfg = WriterConfig::default()
        .with_compression(compression)
        .with_overwrite(overwrite);
    cfg.validate()?;
    Ok(cfg)
}
