//! Machine-readable validation reports.

use std::collections::BTreeMap;
use std::path::Path;

use oemu_dataset::{Dataset, Schema};
use oemu_validate::{ErrorCategory, ValidateError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IoError;

/// Outcome of one validation run, serializable to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Which check ran (`shallow`, `deep`, `prediction`, ...).
    pub check: String,
    pub passed: bool,
    /// `schema` or `consistency` when the check failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Error message when the check failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Value of the schema's provenance attribute, if the dataset has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Dimension sizes of the checked dataset.
    pub sizes: BTreeMap<String, usize>,
}

impl ValidationReport {
    /// Summarize `outcome` of running `check` on `ds`.
    pub fn from_outcome(
        check: impl Into<String>,
        ds: &Dataset,
        schema: &Schema,
        outcome: &Result<(), ValidateError>,
    ) -> Self {
        let (category, message) = match outcome {
            Ok(()) => (None, None),
            Err(e) => {
                let category = match e.category() {
                    ErrorCategory::Schema => "schema",
                    ErrorCategory::Consistency => "consistency",
                };
                (Some(category.to_string()), Some(e.to_string()))
            }
        };
        Self {
            check: check.into(),
            passed: outcome.is_ok(),
            category,
            message,
            revision: ds.attr(schema.provenance_attr()).map(str::to_string),
            sizes: ds.sizes(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, IoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), IoError> {
        std::fs::write(path, self.to_json()?).map_err(|e| IoError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), passed = self.passed, "wrote validation report");
        Ok(())
    }

    pub fn read_json(path: &Path) -> Result<Self, IoError> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|e| IoError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oemu_dataset::{DataArray, PROVENANCE_ATTR};

    fn ds() -> Dataset {
        Dataset::new()
            .with_field("zos", DataArray::filled(["y", "x"], &[2, 3], 0.0).unwrap())
            .unwrap()
            .with_attr(PROVENANCE_ATTR, "0.3.0")
    }

    #[test]
    fn passing_report_omits_error_fields() {
        let report = ValidationReport::from_outcome("shallow", &ds(), &Schema::canonical(), &Ok(()));
        assert!(report.passed);
        assert_eq!(report.revision.as_deref(), Some("0.3.0"));
        assert_eq!(report.sizes["x"], 3);
        let json = report.to_json().unwrap();
        assert!(!json.contains("category"));
        assert!(!json.contains("message"));
    }

    #[test]
    fn failing_report_carries_category() {
        let outcome = Err(ValidateError::MissingDimension { dim: "lev".into() });
        let report = ValidationReport::from_outcome("shallow", &ds(), &Schema::canonical(), &outcome);
        assert!(!report.passed);
        assert_eq!(report.category.as_deref(), Some("schema"));
        assert!(report.message.as_deref().unwrap().contains("lev"));
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let outcome = Err(ValidateError::InconsistentTimeSteps {
            kind: oemu_dataset::FieldKind::Surface,
            variable: "zos".into(),
            indices: vec![2],
        });
        let report = ValidationReport::from_outcome("deep", &ds(), &Schema::canonical(), &outcome);
        report.write_json(&path).unwrap();
        assert_eq!(ValidationReport::read_json(&path).unwrap(), report);
    }

    #[test]
    fn missing_report_file() {
        let err = ValidationReport::read_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
