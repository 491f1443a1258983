//! Flat channel axis <-> named fields.

use std::collections::BTreeMap;

use oemu_dataset::{DataArray, Dataset, FieldKind, Schema, dims};
use tracing::{debug, warn};

use crate::error::PostprocessError;

/// Swap `x` and `y` back if `flat` has them exchanged relative to `schema`.
///
/// Axes count as swapped when `x` has the schema's `y` length and vice
/// versa (and the two lengths differ). The labels are exchanged and the
/// data transposed so the original dimension order is kept. Returns
/// `None` when nothing needs fixing.
pub fn fix_swapped_axes(
    flat: &DataArray,
    schema: &Schema,
) -> Result<Option<DataArray>, PostprocessError> {
    let (Some(want_x), Some(want_y)) = (schema.size_of(dims::X), schema.size_of(dims::Y)) else {
        return Ok(None);
    };
    let (Some(got_x), Some(got_y)) = (flat.len_of(dims::X), flat.len_of(dims::Y)) else {
        return Ok(None);
    };
    if want_x == want_y || got_x != want_y || got_y != want_x {
        return Ok(None);
    }
    warn!(
        x = got_x,
        y = got_y,
        "horizontal axes of the prediction are swapped, transposing them back"
    );
    let swap = BTreeMap::from([
        (dims::X.to_string(), dims::Y.to_string()),
        (dims::Y.to_string(), dims::X.to_string()),
    ]);
    let fixed = flat.rename_dims(&swap)?.transpose(flat.dims())?;
    Ok(Some(fixed))
}

/// Cut the channel axis of `flat` into the named fields of the schema layout.
///
/// Volumetric variables get their block of channels with the channel
/// dimension renamed to `lev`; surface variables get their single channel
/// with the channel dimension dropped.
pub fn split_channels(flat: &DataArray, schema: &Schema) -> Result<Dataset, PostprocessError> {
    let layout = schema.layout();
    let dim = layout.channel_dim();
    let got = flat.axis_of(dim).map(|ax| flat.shape()[ax])?;
    if got != layout.n_channels() {
        return Err(PostprocessError::ChannelCountMismatch {
            dim: dim.to_string(),
            expected: layout.n_channels(),
            got,
        });
    }

    let mut ds = Dataset::new();
    for segment in layout.segments() {
        let field = match segment.kind {
            FieldKind::Volumetric => flat
                .slice_dim(dim, segment.channels.clone())?
                .rename_dim(dim, dims::LEV)?,
            FieldKind::Surface => flat.isel(dim, segment.channels.start)?,
        };
        debug!(variable = %segment.name, channels = ?segment.channels, "split");
        ds.insert_field(segment.name, field)?;
    }
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use oemu_dataset::ChannelLayout;

    fn small_schema() -> Schema {
        Schema::canonical()
            .with_size("x", 3)
            .with_size("y", 2)
            .with_size("lev", 2)
            .with_layout(ChannelLayout::new(["uo", "thetao"], 2, ["zos"]))
    }

    /// `(time, y, x, var)` where every value equals its channel index.
    fn flat(nt: usize, ny: usize, nx: usize, nc: usize) -> DataArray {
        let data = ArrayD::from_shape_fn(IxDyn(&[nt, ny, nx, nc]), |i| i[3] as f64);
        DataArray::new(["time", "y", "x", "var"], data).unwrap()
    }

    #[test]
    fn segments_follow_layout() {
        let ds = split_channels(&flat(2, 2, 3, 5), &small_schema()).unwrap();
        assert_eq!(ds.n_fields(), 3);

        let thetao = ds.require_field("thetao").unwrap();
        assert!(thetao.is_volumetric());
        assert_eq!(thetao.array().dims(), ["time", "y", "x", "lev"]);
        assert_eq!(thetao.array().data()[[1, 1, 2, 0]], 2.0);
        assert_eq!(thetao.array().data()[[0, 0, 0, 1]], 3.0);

        let zos = ds.require_field("zos").unwrap();
        assert_eq!(zos.kind(), FieldKind::Surface);
        assert_eq!(zos.array().dims(), ["time", "y", "x"]);
        assert!(zos.array().data().iter().all(|&v| v == 4.0));
    }

    #[test]
    fn wrong_channel_count_fails() {
        let err = split_channels(&flat(1, 2, 3, 6), &small_schema()).unwrap_err();
        assert_eq!(
            err,
            PostprocessError::ChannelCountMismatch {
                dim: "var".into(),
                expected: 5,
                got: 6,
            }
        );
    }

    #[test]
    fn swapped_axes_are_fixed() {
        let data = ArrayD::from_shape_fn(IxDyn(&[1, 3, 2, 5]), |i| (10 * i[1] + i[2]) as f64);
        let swapped = DataArray::new(["time", "y", "x", "var"], data).unwrap();
        let fixed = fix_swapped_axes(&swapped, &small_schema()).unwrap().unwrap();
        assert_eq!(fixed.dims(), ["time", "y", "x", "var"]);
        assert_eq!(fixed.shape(), &[1, 2, 3, 5]);
        // old (y=2, x=1) is new (x=2, y=1)
        assert_eq!(fixed.data()[[0, 1, 2, 0]], 21.0);
    }

    #[test]
    fn correct_axes_are_left_alone() {
        assert!(fix_swapped_axes(&flat(1, 2, 3, 5), &small_schema()).unwrap().is_none());
    }
}
