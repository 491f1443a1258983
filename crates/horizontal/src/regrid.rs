//! Applying conservative weights to datasets.

use ndarray::{Array2, ArrayD, IxDyn};
use oemu_dataset::{DataArray, Dataset, DatasetError};
use tracing::{debug, info, warn};

use crate::backend::{RegridBackend, RegridWeights, default_backend};
use crate::check::check_vertex_order;
use crate::config::{RegridConfig, RegridMethod};
use crate::error::{GridSide, HorizontalError};
use crate::vertices::{X_VERTICES, Y_VERTICES, vertex_geometry};

/// Precomputed regridding operator between two horizontal grids.
///
/// Building one is the expensive step; [`apply`](Self::apply) can then be
/// called on any number of datasets on the source grid.
#[derive(Debug, Clone)]
pub struct Regridder {
    config: RegridConfig,
    weights: RegridWeights,
    /// Target coordinates carried over to every output.
    target_coords: Vec<(String, DataArray)>,
}

fn is_horizontal(dim: &str, config: &RegridConfig) -> bool {
    dim == config.x_dim() || dim == config.y_dim() || dim == X_VERTICES || dim == Y_VERTICES
}

impl Regridder {
    /// Compute weights from the grid of `source` to the grid of `target`.
    ///
    /// When `config.check()` is set, the vertex order of both grids is
    /// verified before any weights are computed.
    pub fn new(
        source: &Dataset,
        target: &Dataset,
        config: RegridConfig,
        backend: &dyn RegridBackend,
    ) -> Result<Self, HorizontalError> {
        config.validate()?;
        if config.check() {
            check_vertex_order(source, &config, GridSide::Source)?;
            check_vertex_order(target, &config, GridSide::Target)?;
        }

        let weights = {
            let src = vertex_geometry(source, &config, GridSide::Source);
            let dst = vertex_geometry(target, &config, GridSide::Target);
            let src = src.force().as_ref().map_err(Clone::clone)?;
            let dst = dst.force().as_ref().map_err(Clone::clone)?;
            backend.weights(src, dst, &config)?
        };
        if weights.n_unmapped() > 0 {
            warn!(
                unmapped = weights.n_unmapped(),
                "target cells without any source overlap"
            );
        }
        info!(
            backend = backend.name(),
            method = %config.method(),
            nnz = weights.nnz(),
            "built regridder"
        );

        let target_coords = target
            .coords()
            .filter(|(_, c)| c.dims().iter().all(|d| is_horizontal(d, &config)))
            .map(|(n, c)| (n.clone(), c.clone()))
            .collect();

        Ok(Self {
            config,
            weights,
            target_coords,
        })
    }

    pub fn config(&self) -> &RegridConfig {
        &self.config
    }

    pub fn weights(&self) -> &RegridWeights {
        &self.weights
    }

    /// Regrid a single array with dims including `y` and `x`.
    ///
    /// Other dimensions are carried through unchanged and the dimension
    /// order of `array` is preserved.
    pub fn apply_array(&self, name: &str, array: &DataArray) -> Result<DataArray, HorizontalError> {
        let (x_dim, y_dim) = (self.config.x_dim(), self.config.y_dim());
        let (sny, snx) = self.weights.source_shape();
        let (tny, tnx) = self.weights.target_shape();
        for (dim, expected) in [(y_dim, sny), (x_dim, snx)] {
            let got = array.axis_of(dim).map(|ax| array.shape()[ax])?;
            if got != expected {
                return Err(HorizontalError::GridMismatch {
                    variable: name.to_string(),
                    dim: dim.to_string(),
                    expected,
                    got,
                });
            }
        }

        let mut order: Vec<String> = array
            .dims()
            .iter()
            .filter(|d| *d != x_dim && *d != y_dim)
            .cloned()
            .collect();
        let mut out_shape: Vec<usize> = order
            .iter()
            .map(|d| array.len_of(d).unwrap_or(1))
            .collect();
        let lead: usize = out_shape.iter().product();
        order.push(y_dim.to_string());
        order.push(x_dim.to_string());
        out_shape.extend([tny, tnx]);

        let flat = array
            .transpose(&order)?
            .into_data()
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((lead, sny * snx))
            .map_err(DatasetError::from)?;

        let mut out = Array2::<f64>::zeros((lead, tny * tnx));
        for (src_row, mut dst_row) in flat.outer_iter().zip(out.outer_iter_mut()) {
            for (t, weights) in self.weights.rows().iter().enumerate() {
                dst_row[t] = self.combine(weights, |s| src_row[s]);
            }
        }

        let out: ArrayD<f64> = out
            .into_shape_with_order(IxDyn(&out_shape))
            .map_err(DatasetError::from)?;
        Ok(DataArray::new(order, out)?.transpose(array.dims())?)
    }

    fn combine(&self, weights: &[(usize, f64)], value: impl Fn(usize) -> f64) -> f64 {
        if weights.is_empty() {
            return if self.config.unmapped_to_nan() { f64::NAN } else { 0.0 };
        }
        match self.config.method() {
            RegridMethod::Conservative => weights.iter().map(|&(s, w)| w * value(s)).sum(),
            RegridMethod::ConservativeNormed => {
                let (sum, norm) = weights
                    .iter()
                    .map(|&(s, w)| (value(s), w))
                    .filter(|(v, _)| !v.is_nan())
                    .fold((0.0, 0.0), |(sum, norm), (v, w)| (sum + w * v, norm + w));
                if norm > 0.0 { sum / norm } else { f64::NAN }
            }
        }
    }

    /// Regrid every field of `source` that lies on the horizontal grid.
    ///
    /// Fields without horizontal dims pass through. Source coordinates that
    /// touch the horizontal grid are replaced by the target's horizontal
    /// coordinates; attributes are kept.
    #[tracing::instrument(skip_all, fields(n_fields = source.n_fields()))]
    pub fn apply(&self, source: &Dataset) -> Result<Dataset, HorizontalError> {
        let mut out = Dataset::new();
        for (name, coord) in &self.target_coords {
            out.insert_coord(name.clone(), coord.clone())?;
        }
        for (name, coord) in source.coords() {
            let horizontal = coord
                .dims()
                .iter()
                .any(|d| is_horizontal(d, &self.config) || d == self.config.vertex_dim());
            if !horizontal {
                out.insert_coord(name.clone(), coord.clone())?;
            }
        }
        for (name, field) in source.fields() {
            let array = field.array();
            let regridded = if array.has_dim(self.config.x_dim()) || array.has_dim(self.config.y_dim()) {
                self.apply_array(name, array)?
            } else {
                array.clone()
            };
            debug!(field = %name, missing = regridded.count_missing(), "regridded field");
            out.insert_field(name.clone(), regridded)?;
        }
        out.set_attrs(source.attrs().clone());
        Ok(out)
    }
}

/// Conservatively regrid `source` onto the horizontal grid of `target` with
/// the compiled-in backend.
///
/// # Errors
///
/// [`HorizontalError::BackendUnavailable`] without a backend, the vertex
/// order errors when `config.check()` is set, plus geometry and shape errors.
#[tracing::instrument(skip_all, fields(method = %config.method(), check = config.check()))]
pub fn spatially_regrid(
    source: &Dataset,
    target: &Dataset,
    config: &RegridConfig,
) -> Result<Dataset, HorizontalError> {
    let backend = default_backend()?;
    Regridder::new(source, target, config.clone(), backend.as_ref())?.apply(source)
}
