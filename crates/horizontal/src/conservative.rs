//! Built-in first-order conservative backend.
//!
//! Cells are projected to `(lon in radians, sin(lat))`, an equal-area
//! projection in which lon/lat boxes have exactly their spherical area (unit
//! sphere). Overlaps are clipped polygon areas; candidate source cells come
//! from an R-tree over the source cell envelopes.

use std::f64::consts::TAU;

use rstar::{AABB, RTree, RTreeObject};
use tracing::debug;

use crate::backend::{RegridBackend, RegridWeights};
use crate::config::RegridConfig;
use crate::error::{GridSide, HorizontalError};
use crate::geometry::{Point, Polygon};
use crate::vertices::VertexGrid;

/// Relative area below which a cell counts as degenerate.
const DEGENERATE_AREA: f64 = 1e-14;

#[derive(Debug, Clone)]
struct CellEnvelope {
    index: usize,
    envelope: AABB<Point>,
}

impl RTreeObject for CellEnvelope {
    type Envelope = AABB<Point>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Conservative overlap weights computed in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeBackend;

impl ConservativeBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Project cell `(j, i)` and unwrap its longitudes around the first corner.
fn cell_polygon(grid: &VertexGrid, j: usize, i: usize) -> Option<Polygon> {
    let corners = grid.cell_corners(j, i);
    let lon0 = corners[0].0;
    let mut pts = Vec::with_capacity(4);
    for (lon, lat) in corners {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        let mut lon = lon;
        while lon - lon0 > 180.0 {
            lon -= 360.0;
        }
        while lon - lon0 < -180.0 {
            lon += 360.0;
        }
        pts.push([lon.to_radians(), lat.to_radians().sin()]);
    }
    let polygon = Polygon::new(pts);
    (polygon.area() > DEGENERATE_AREA).then_some(polygon)
}

/// Polygons of every cell, `None` for degenerate ones (or an error if
/// degenerate cells are not ignored).
fn polygons(
    grid: &VertexGrid,
    side: GridSide,
    ignore_degenerate: bool,
) -> Result<Vec<Option<Polygon>>, HorizontalError> {
    let (ny, nx) = (grid.ny(), grid.nx());
    let mut out = Vec::with_capacity(ny * nx);
    for j in 0..ny {
        for i in 0..nx {
            let poly = cell_polygon(grid, j, i);
            if poly.is_none() && !ignore_degenerate {
                return Err(HorizontalError::DegenerateCell { side, y: j, x: i });
            }
            out.push(poly);
        }
    }
    Ok(out)
}

impl RegridBackend for ConservativeBackend {
    fn name(&self) -> &str {
        "builtin-conservative"
    }

    fn weights(
        &self,
        source: &VertexGrid,
        target: &VertexGrid,
        config: &RegridConfig,
    ) -> Result<RegridWeights, HorizontalError> {
        let src = polygons(source, GridSide::Source, config.ignore_degenerate())?;
        let dst = polygons(target, GridSide::Target, config.ignore_degenerate())?;

        let tree = RTree::bulk_load(
            src.iter()
                .enumerate()
                .filter_map(|(index, p)| {
                    p.as_ref().map(|p| CellEnvelope {
                        index,
                        envelope: p.envelope(),
                    })
                })
                .collect(),
        );

        let shifts: &[f64] = if config.periodic() {
            &[0.0, -TAU, TAU]
        } else {
            &[0.0]
        };

        let mut rows = Vec::with_capacity(dst.len());
        for cell in &dst {
            let mut row = Vec::new();
            if let Some(cell) = cell {
                let area = cell.area();
                for &shift in shifts {
                    let shifted = cell.translate(shift);
                    for cand in tree.locate_in_envelope_intersecting(&shifted.envelope()) {
                        let Some(src_poly) = &src[cand.index] else {
                            continue;
                        };
                        let overlap = src_poly.clip(&shifted);
                        if overlap.is_empty() {
                            continue;
                        }
                        let w = overlap.area() / area;
                        if w > DEGENERATE_AREA {
                            row.push((cand.index, w));
                        }
                    }
                }
                row.sort_by_key(|&(s, _)| s);
            }
            rows.push(row);
        }

        let weights = RegridWeights::new(
            (source.ny(), source.nx()),
            (target.ny(), target.nx()),
            rows,
        )?;
        debug!(
            nnz = weights.nnz(),
            unmapped = weights.n_unmapped(),
            "computed conservative weights"
        );
        Ok(weights)
    }
}
