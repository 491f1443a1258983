//! Gridded ocean dataset model.
//!
//! Named-dimension arrays ([`DataArray`]), tagged surface/volumetric fields
//! ([`Field`]), the [`Dataset`] container, boolean wet/dry [`Mask`]s, vertical
//! [`DepthBounds`], the injectable [`Schema`] with its [`ChannelLayout`], and
//! an explicit [`Deferred`] value type.
//!
//! All arrays are in-memory `ndarray` values; missing data is `NaN`.

mod array;
mod dataset;
mod deferred;
mod depth;
mod error;
mod field;
mod mask;
mod schema;

pub use array::DataArray;
pub use dataset::{Attrs, Dataset};
pub use deferred::Deferred;
pub use depth::DepthBounds;
pub use error::DatasetError;
pub use field::{Field, FieldKind};
pub use mask::Mask;
pub use schema::{ChannelLayout, ChannelSegment, FLAT_VARIABLE, PROVENANCE_ATTR, Schema, WETMASK};

/// Canonical dimension names.
pub mod dims {
    /// Longitude-like horizontal index.
    pub const X: &str = "x";
    /// Latitude-like horizontal index.
    pub const Y: &str = "y";
    /// Depth level.
    pub const LEV: &str = "lev";
    pub const TIME: &str = "time";
    /// Flat channel axis of a model output.
    pub const CHANNEL: &str = "var";
}
