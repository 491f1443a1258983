//! Postprocessing of flat emulator predictions.
//!
//! An emulator writes one array whose channel axis concatenates every
//! variable and depth level. [`split_channels`] cuts it back into named
//! fields following the schema's [`ChannelLayout`], and [`post_process`]
//! additionally repairs swapped horizontal axes, applies the input wetmask
//! and attaches the input coordinates and attributes.
//!
//! [`ChannelLayout`]: oemu_dataset::ChannelLayout

mod channels;
mod error;
mod process;

pub use channels::{fix_swapped_axes, split_channels};
pub use error::PostprocessError;
pub use process::{post_process, post_process_dataset};
