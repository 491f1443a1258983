//! Horizontal regridding of gridded ocean datasets.
//!
//! Source and target grids are described by their cell corners. Per-cell
//! bounds `(y, x, vertex)` are converted to shared vertices ([`VertexGrid`])
//! on demand, a [`RegridBackend`] computes first-order conservative overlap
//! weights, and a [`Regridder`] applies them to every field on the grid.
//!
//! The built-in backend is compiled with the `builtin-solver` feature (on by
//! default). Without it [`spatially_regrid`] fails with
//! [`HorizontalError::BackendUnavailable`]; callers may still supply their own
//! backend to [`Regridder::new`].

mod backend;
mod check;
mod config;
#[cfg(feature = "builtin-solver")]
mod conservative;
mod error;
#[cfg(feature = "builtin-solver")]
mod geometry;
mod regrid;
mod vertices;

pub use backend::{RegridBackend, RegridWeights, default_backend};
pub use check::check_vertex_order;
pub use config::{CheckPatch, CornerOrder, RegridConfig, RegridMethod};
#[cfg(feature = "builtin-solver")]
pub use conservative::ConservativeBackend;
pub use error::{GridSide, HorizontalError};
pub use regrid::{Regridder, spatially_regrid};
pub use vertices::{
    LAT_B, LON_B, VertexGrid, X_VERTICES, Y_VERTICES, bounds_to_vertices, derive_vertices,
    detect_corner_order, vertex_geometry, with_vertex_coords,
};
