//! Vertical regridding of gridded ocean datasets.
//!
//! Volumetric fields are converted to extensive content (value times cell
//! thickness), remapped conservatively from the source depth cells onto a
//! target set of depth bounds, and converted back to intensive values with
//! the target thickness. The column integral is conserved wherever the
//! target grid overlaps the source grid.
//!
//! [`infer_vertical_cell_extent`] derives the time-varying thickness of z*
//! models from their nominal thickness and sea surface height.

mod config;
mod error;
mod extent;
mod regrid;
mod remap;

pub use config::{CANONICAL_DEPTH_BOUNDS, VerticalConfig, canonical_depth_bounds};
pub use error::VerticalError;
pub use extent::infer_vertical_cell_extent;
pub use regrid::{vertical_regrid, vertical_regrid_with};
pub use remap::{ConservativeTransform, VerticalTransform, remap_along};
