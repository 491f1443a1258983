//! Full postprocessing of a prediction against its input dataset.

use oemu_dataset::{DataArray, Dataset, Schema};
use oemu_mask::apply_mask;
use tracing::{debug, info};

use crate::channels::{fix_swapped_axes, split_channels};
use crate::error::PostprocessError;

/// Turn a flat prediction into a standardized dataset shaped like `input`.
///
/// Steps: repair swapped `x`/`y` axes (with a warning), split the channel
/// axis per the schema layout, apply the input wetmask (surface fields get
/// its top level), then attach every input coordinate (replacing same-named
/// ones) and copy the input attributes. Input coordinates on the time
/// dimension are attached only if the prediction has the same number of
/// time steps.
#[tracing::instrument(skip_all, fields(shape = ?flat.shape()))]
pub fn post_process(
    flat: &DataArray,
    input: &Dataset,
    schema: &Schema,
) -> Result<Dataset, PostprocessError> {
    let fixed = fix_swapped_axes(flat, schema)?;
    let flat = fixed.as_ref().unwrap_or(flat);

    let split = split_channels(flat, schema)?;
    let wetmask = input.wetmask(schema.wetmask())?;
    let mut out = apply_mask(&split, &wetmask)?;

    let time_dim = schema.time_dim();
    let pred_time = out.sizes().get(time_dim).copied();
    for (name, coord) in input.coords() {
        let coord_time = coord.len_of(time_dim);
        if coord_time.is_some() && coord_time != pred_time {
            debug!(coord = %name, "skipping input coordinate with a different time length");
            continue;
        }
        out.insert_coord(name.clone(), coord.clone())?;
    }
    out.set_attrs(input.attrs().clone());

    info!(n_fields = out.n_fields(), "postprocessed prediction");
    Ok(out)
}

/// [`post_process`] on a dataset holding the flat prediction under the
/// layout's sentinel variable name.
pub fn post_process_dataset(
    raw: &Dataset,
    input: &Dataset,
    schema: &Schema,
) -> Result<Dataset, PostprocessError> {
    let flat = raw.require_field(schema.layout().variable())?.array();
    post_process(flat, input, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use oemu_dataset::{ChannelLayout, FLAT_VARIABLE, Mask};

    fn schema() -> Schema {
        Schema::canonical()
            .with_size("x", 3)
            .with_size("y", 2)
            .with_size("lev", 2)
            .with_layout(ChannelLayout::new(["thetao"], 2, ["zos"]))
    }

    fn input(nt: usize) -> Dataset {
        let mask = ArrayD::from_shape_fn(IxDyn(&[3, 2, 2]), |i| f64::from(u8::from(i[0] > 0 || i[2] == 0)));
        Dataset::new()
            .with_coord("wetmask", DataArray::new(["x", "y", "lev"], mask).unwrap())
            .unwrap()
            .with_coord("lev", DataArray::from_vec("lev", vec![5.0, 15.0]))
            .unwrap()
            .with_coord("time", DataArray::from_vec("time", (0..nt).map(|t| t as f64).collect()))
            .unwrap()
            .with_attr("title", "input")
    }

    fn raw(nt: usize) -> Dataset {
        let data = ArrayD::from_elem(IxDyn(&[nt, 2, 3, 3]), 1.0);
        Dataset::new()
            .with_field(FLAT_VARIABLE, DataArray::new(["time", "y", "x", "var"], data).unwrap())
            .unwrap()
    }

    #[test]
    fn masks_and_attaches_input_metadata() {
        let out = post_process_dataset(&raw(2), &input(2), &schema()).unwrap();
        assert_eq!(out.field_names().into_iter().collect::<Vec<_>>(), ["thetao", "zos"]);
        assert_eq!(out.attr("title"), Some("input"));
        assert_eq!(out.coord("time"), input(2).coord("time"));

        let thetao = out.require_field("thetao").unwrap().array();
        // x = 0 is land below the top level
        assert!(thetao.data()[[0, 0, 0, 1]].is_nan());
        assert_eq!(thetao.data()[[0, 0, 0, 0]], 1.0);
        let mask = Mask::from_array(input(2).require_coord("wetmask").unwrap());
        oemu_mask::assert_mask_match(&out, &mask).unwrap();
    }

    #[test]
    fn time_coordinate_of_other_length_is_skipped() {
        let out = post_process_dataset(&raw(4), &input(2), &schema()).unwrap();
        assert!(out.coord("time").is_none());
        assert!(out.coord("lev").is_some());
    }

    #[test]
    fn missing_flat_variable() {
        let err = post_process_dataset(&Dataset::new(), &input(1), &schema()).unwrap_err();
        assert!(matches!(err, PostprocessError::Dataset(_)));
    }
}
