//! Wet/dry mask engine.
//!
//! Applies a wetmask to every field of a dataset, asserts that a dataset's
//! missing values agree with a wetmask, and derives masks from data. Masks
//! with more dimensions than a field are reduced onto the field according to
//! a [`MaskReduction`] policy.

mod apply;
mod derive;
mod error;
mod reduce;

pub use apply::{apply_mask, apply_mask_with, assert_mask_match, assert_mask_match_with};
pub use derive::{derive_wetmask, land_fraction};
pub use error::MaskError;
pub use reduce::{MaskReduction, reduce_mask};
