//! Configuration for horizontal regridding.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use oemu_dataset::dims;

use crate::error::HorizontalError;

/// Conservative regridding flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegridMethod {
    /// Area-weighted sum of overlapping source cells; missing sources propagate.
    #[default]
    Conservative,
    /// Area-weighted mean over the non-missing overlapping source cells.
    ConservativeNormed,
}

impl RegridMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RegridMethod::Conservative => "conservative",
            RegridMethod::ConservativeNormed => "conservative_normed",
        }
    }
}

impl fmt::Display for RegridMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegridMethod {
    type Err = HorizontalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conservative" => Ok(RegridMethod::Conservative),
            "conservative_normed" => Ok(RegridMethod::ConservativeNormed),
            other => Err(HorizontalError::InvalidConfig {
                reason: format!(
                    "unknown regrid method '{other}' (expected 'conservative' or 'conservative_normed')"
                ),
            }),
        }
    }
}

/// Corner ordering of per-cell bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerOrder {
    /// Corners go lower-left, lower-right, upper-right, upper-left.
    Counterclockwise,
    /// Corners go lower-left, upper-left, upper-right, lower-right.
    Clockwise,
}

/// Cell window used by the vertex-order check.
///
/// Pick a window away from the poles and the tripolar seam, where corner
/// coordinates legitimately stop being monotonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPatch {
    pub x: Range<usize>,
    pub y: Range<usize>,
}

impl Default for CheckPatch {
    fn default() -> Self {
        Self { x: 20..22, y: 20..22 }
    }
}

/// Horizontal regridding configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RegridConfig {
    method: RegridMethod,
    /// Verify vertex order of both grids before regridding.
    check: bool,
    /// Treat longitude as periodic.
    periodic: bool,
    /// Skip zero-area cells instead of failing.
    ignore_degenerate: bool,
    /// Target cells with no source overlap become `NaN` (otherwise 0).
    unmapped_to_nan: bool,
    patch: CheckPatch,
    /// `None` auto-detects the corner order.
    corner_order: Option<CornerOrder>,
    lon_bounds: String,
    lat_bounds: String,
    vertex_dim: String,
    x_dim: String,
    y_dim: String,
}

impl Default for RegridConfig {
    fn default() -> Self {
        Self {
            method: RegridMethod::default(),
            check: false,
            periodic: true,
            ignore_degenerate: true,
            unmapped_to_nan: true,
            patch: CheckPatch::default(),
            corner_order: None,
            lon_bounds: "lon_verticies".to_string(),
            lat_bounds: "lat_verticies".to_string(),
            vertex_dim: "vertex".to_string(),
            x_dim: dims::X.to_string(),
            y_dim: dims::Y.to_string(),
        }
    }
}

impl RegridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: RegridMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn with_periodic(mut self, periodic: bool) -> Self {
        self.periodic = periodic;
        self
    }

    pub fn with_ignore_degenerate(mut self, ignore: bool) -> Self {
        self.ignore_degenerate = ignore;
        self
    }

    pub fn with_unmapped_to_nan(mut self, to_nan: bool) -> Self {
        self.unmapped_to_nan = to_nan;
        self
    }

    pub fn with_patch(mut self, x: Range<usize>, y: Range<usize>) -> Self {
        self.patch = CheckPatch { x, y };
        self
    }

    pub fn with_corner_order(mut self, order: Option<CornerOrder>) -> Self {
        self.corner_order = order;
        self
    }

    /// Names of the per-cell corner coordinates and their corner dimension.
    pub fn with_bounds_names(
        mut self,
        lon: impl Into<String>,
        lat: impl Into<String>,
        vertex_dim: impl Into<String>,
    ) -> Self {
        self.lon_bounds = lon.into();
        self.lat_bounds = lat.into();
        self.vertex_dim = vertex_dim.into();
        self
    }

    pub fn method(&self) -> RegridMethod {
        self.method
    }

    pub fn check(&self) -> bool {
        self.check
    }

    pub fn periodic(&self) -> bool {
        self.periodic
    }

    pub fn ignore_degenerate(&self) -> bool {
        self.ignore_degenerate
    }

    pub fn unmapped_to_nan(&self) -> bool {
        self.unmapped_to_nan
    }

    pub fn patch(&self) -> &CheckPatch {
        &self.patch
    }

    pub fn corner_order(&self) -> Option<CornerOrder> {
        self.corner_order
    }

    pub fn lon_bounds(&self) -> &str {
        &self.lon_bounds
    }

    pub fn lat_bounds(&self) -> &str {
        &self.lat_bounds
    }

    pub fn vertex_dim(&self) -> &str {
        &self.vertex_dim
    }

    pub fn x_dim(&self) -> &str {
        &self.x_dim
    }

    pub fn y_dim(&self) -> &str {
        &self.y_dim
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), HorizontalError> {
        if self.patch.x.is_empty() || self.patch.y.is_empty() {
            return Err(HorizontalError::InvalidConfig {
                reason: format!(
                    "check patch must be non-empty, got x={:?}, y={:?}",
                    self.patch.x, self.patch.y
                ),
            });
        }
        for (key, value) in [
            ("lon_bounds", &self.lon_bounds),
            ("lat_bounds", &self.lat_bounds),
            ("vertex_dim", &self.vertex_dim),
        ] {
            if value.is_empty() {
                return Err(HorizontalError::InvalidConfig {
                    reason: format!("{key} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_conservative_regridding() {
        let c = RegridConfig::new();
        assert_eq!(c.method(), RegridMethod::Conservative);
        assert!(!c.check());
        assert!(c.periodic());
        assert!(c.ignore_degenerate());
        assert!(c.unmapped_to_nan());
        assert_eq!(c.patch(), &CheckPatch { x: 20..22, y: 20..22 });
        assert_eq!(c.corner_order(), None);
        assert_eq!(c.lon_bounds(), "lon_verticies");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn method_parses() {
        assert_eq!("conservative".parse::<RegridMethod>().unwrap(), RegridMethod::Conservative);
        assert_eq!(
            "conservative_normed".parse::<RegridMethod>().unwrap(),
            RegridMethod::ConservativeNormed
        );
        assert!("bilinear".parse::<RegridMethod>().is_err());
        assert_eq!(RegridMethod::ConservativeNormed.to_string(), "conservative_normed");
    }

    #[test]
    fn empty_patch_is_invalid() {
        let c = RegridConfig::new().with_patch(3..3, 0..2);
        assert!(matches!(
            c.validate(),
            Err(HorizontalError::InvalidConfig { .. })
        ));
    }
}
