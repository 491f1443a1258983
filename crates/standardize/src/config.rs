//! Configuration for the standardization pipeline.

use oemu_dataset::{DepthBounds, Schema};
use oemu_horizontal::RegridConfig;
use oemu_vertical::VerticalConfig;

use crate::error::StandardizeError;

/// Master configuration for [`standardize_dataset`](crate::standardize_dataset).
#[derive(Debug, Clone)]
pub struct StandardizeConfig {
    /// Schema the output must satisfy.
    schema: Schema,
    /// Recompute z* cell thickness from `thkcello`, `deptho` and `zos`.
    infer_cell_extent: bool,
    /// Target depth bounds (None = skip vertical regridding).
    vertical_target: Option<DepthBounds>,
    vertical: VerticalConfig,
    horizontal: RegridConfig,
    /// Field whose first time step defines the wetmask (None = no wetmask).
    wetmask_tracer: Option<String>,
    /// Value written under the schema's provenance attribute.
    revision: String,
    /// Run the shallow check on the output.
    shallow_check: bool,
}

impl Default for StandardizeConfig {
    fn default() -> Self {
        Self {
            schema: Schema::canonical(),
            infer_cell_extent: false,
            vertical_target: None,
            vertical: VerticalConfig::default(),
            horizontal: RegridConfig::default(),
            wetmask_tracer: Some("thetao".to_string()),
            revision: env!("CARGO_PKG_VERSION").to_string(),
            shallow_check: true,
        }
    }
}

impl StandardizeConfig {
    /// Creates a configuration with the canonical schema, no vertical
    /// target, and `thetao` as wetmask tracer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_infer_cell_extent(mut self, infer: bool) -> Self {
        self.infer_cell_extent = infer;
        self
    }

    pub fn with_vertical_target(mut self, target: Option<DepthBounds>) -> Self {
        self.vertical_target = target;
        self
    }

    pub fn with_vertical(mut self, config: VerticalConfig) -> Self {
        self.vertical = config;
        self
    }

    pub fn with_horizontal(mut self, config: RegridConfig) -> Self {
        self.horizontal = config;
        self
    }

    pub fn with_wetmask_tracer(mut self, tracer: Option<String>) -> Self {
        self.wetmask_tracer = tracer;
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_shallow_check(mut self, check: bool) -> Self {
        self.shallow_check = check;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn infer_cell_extent(&self) -> bool {
        self.infer_cell_extent
    }

    pub fn vertical_target(&self) -> Option<&DepthBounds> {
        self.vertical_target.as_ref()
    }

    pub fn vertical(&self) -> &VerticalConfig {
        &self.vertical
    }

    pub fn horizontal(&self) -> &RegridConfig {
        &self.horizontal
    }

    pub fn wetmask_tracer(&self) -> Option<&str> {
        self.wetmask_tracer.as_deref()
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn shallow_check(&self) -> bool {
        self.shallow_check
    }

    /// Validates this configuration and every nested one.
    pub fn validate(&self) -> Result<(), StandardizeError> {
        self.schema.validate()?;
        self.vertical.validate()?;
        self.horizontal.validate()?;
        if self.revision.trim().is_empty() {
            return Err(StandardizeError::InvalidConfig {
                reason: "revision must not be empty".to_string(),
            });
        }
        if let Some(tracer) = &self.wetmask_tracer
            && tracer.is_empty()
        {
            return Err(StandardizeError::InvalidConfig {
                reason: "wetmask tracer name must not be empty".to_string(),
            });
        }
        if let (Some(target), Some(n)) = (&self.vertical_target, self.schema.size_of(self.vertical.lev_dim()))
            && target.n_cells() != n
        {
            return Err(StandardizeError::InvalidConfig {
                reason: format!(
                    "vertical target has {} cells but the schema fixes {}={n}",
                    target.n_cells(),
                    self.vertical.lev_dim()
                ),
            });
        }
        Ok(())
    }
}
