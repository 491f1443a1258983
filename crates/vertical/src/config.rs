//! Configuration for vertical regridding.

use oemu_dataset::{DatasetError, DepthBounds, dims};

use crate::error::VerticalError;

/// Boundaries of the canonical 19-level target grid (metres, positive down).
pub const CANONICAL_DEPTH_BOUNDS: [f64; 20] = [
    0.0, 5.0, 15.0, 30.0, 50.0, 80.0, 130.0, 200.0, 300.0, 450.0, 650.0, 900.0, 1200.0, 1600.0,
    2100.0, 2700.0, 3500.0, 4500.0, 5500.0, 6500.0,
];

/// The canonical 19-level target grid.
pub fn canonical_depth_bounds() -> Result<DepthBounds, DatasetError> {
    DepthBounds::new(CANONICAL_DEPTH_BOUNDS.to_vec())
}

/// Names of the variables that describe the source vertical grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerticalConfig {
    /// Depth dimension of volumetric fields.
    lev_dim: String,
    /// Per-cell bounds variable with dims `(lev, bnds)`.
    bounds_coord: String,
    /// Two-element dimension of the bounds variable.
    bounds_dim: String,
    /// Cell thickness variable multiplied in before remapping.
    thickness_coord: String,
}

impl Default for VerticalConfig {
    fn default() -> Self {
        Self {
            lev_dim: dims::LEV.to_string(),
            bounds_coord: "lev_bounds".to_string(),
            bounds_dim: "bnds".to_string(),
            thickness_coord: "dz".to_string(),
        }
    }
}

impl VerticalConfig {
    /// Creates a configuration with the CMIP-style default names.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lev_dim(mut self, name: impl Into<String>) -> Self {
        self.lev_dim = name.into();
        self
    }

    pub fn with_bounds_coord(mut self, name: impl Into<String>) -> Self {
        self.bounds_coord = name.into();
        self
    }

    pub fn with_bounds_dim(mut self, name: impl Into<String>) -> Self {
        self.bounds_dim = name.into();
        self
    }

    pub fn with_thickness_coord(mut self, name: impl Into<String>) -> Self {
        self.thickness_coord = name.into();
        self
    }

    pub fn lev_dim(&self) -> &str {
        &self.lev_dim
    }

    pub fn bounds_coord(&self) -> &str {
        &self.bounds_coord
    }

    pub fn bounds_dim(&self) -> &str {
        &self.bounds_dim
    }

    pub fn thickness_coord(&self) -> &str {
        &self.thickness_coord
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), VerticalError> {
        let names = [
            ("lev_dim", &self.lev_dim),
            ("bounds_coord", &self.bounds_coord),
            ("bounds_dim", &self.bounds_dim),
            ("thickness_coord", &self.thickness_coord),
        ];
        for (key, value) in names {
            if value.is_empty() {
                return Err(VerticalError::InvalidConfig {
                    reason: format!("{key} must not be empty"),
                });
            }
        }
        if self.lev_dim == self.bounds_dim {
            return Err(VerticalError::InvalidConfig {
                reason: format!("lev_dim and bounds_dim are both '{}'", self.lev_dim),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn defaults() {
        let c = VerticalConfig::new();
        assert_eq!(c.lev_dim(), "lev");
        assert_eq!(c.bounds_coord(), "lev_bounds");
        assert_eq!(c.bounds_dim(), "bnds");
        assert_eq!(c.thickness_coord(), "dz");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_empty_and_clashing_names() {
        assert!(VerticalConfig::new().with_bounds_coord("").validate().is_err());
        assert!(VerticalConfig::new().with_bounds_dim("lev").validate().is_err());
    }

    #[test]
    fn canonical_grid_centers() {
        let b = canonical_depth_bounds().unwrap();
        assert_eq!(b.n_cells(), 19);
        let centers = b.centers();
        assert_abs_diff_eq!(centers[0], 2.5);
        assert_abs_diff_eq!(centers[3], 40.0);
        assert_abs_diff_eq!(centers[18], 6000.0);
        assert_abs_diff_eq!(b.thickness()[16], 1000.0);
    }
}
