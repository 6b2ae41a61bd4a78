//! ICP report payloads.
//!
//! An ICP report is opaque JSON: nothing here inspects or rewrites report
//! contents, so whatever is loaded is exactly what gets written.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Workflow status written alongside a fresh ICP report.
pub const DEFAULT_WORKFLOW_STATUS: &str = "icp_ready";

/// Key under `company_report.phase_data` that holds the ICP report.
pub const ICP_REPORT_KEY: &str = "phase_2_icp_report";

/// One Ideal Customer Profile report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IcpReport(Value);

impl IcpReport {
    /// Wrap an arbitrary JSON value as a report.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The report's label, such as `ICP-001`, if it carries one.
    pub fn label(&self) -> Option<&str> {
        let object = self.0.as_object()?;
        object
            .get("icp_id")
            .or_else(|| object.get("id"))
            .and_then(Value::as_str)
    }
}

/// The full ICP payload: `{ "icp_reports": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IcpData {
    /// The reports, in the order they were authored.
    pub icp_reports: Vec<IcpReport>,

    /// Any other top-level keys, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IcpData {
    /// Build a payload from a list of reports.
    pub fn new(icp_reports: Vec<IcpReport>) -> Self {
        Self {
            icp_reports,
            extra: Map::new(),
        }
    }

    /// Load a payload from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a payload from JSON text.
    ///
    /// The top level must be an object with an `icp_reports` array.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match value.get("icp_reports") {
            Some(Value::Array(_)) => Ok(serde_json::from_value(value)?),
            Some(other) => Err(Error::UnexpectedShape(format!(
                "icp_reports must be an array, got {other}"
            ))),
            None => Err(Error::UnexpectedShape(
                "ICP payload has no icp_reports array".to_string(),
            )),
        }
    }

    /// Number of reports in the payload.
    pub fn count(&self) -> usize {
        self.icp_reports.len()
    }

    /// Labels that appear on more than one report.
    pub fn duplicate_labels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for label in self.icp_reports.iter().filter_map(IcpReport::label) {
            if !seen.insert(label) && !duplicates.iter().any(|d| d == label) {
                duplicates.push(label.to_string());
            }
        }
        duplicates
    }

    /// The payload as a JSON value.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// New value of the `company_report` column after an ICP push.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportUpdate {
    icp: IcpData,
    workflow_status: String,
}

impl ReportUpdate {
    /// Create an update carrying `icp` with the default `icp_ready` status.
    pub fn new(icp: IcpData) -> Self {
        Self {
            icp,
            workflow_status: DEFAULT_WORKFLOW_STATUS.to_string(),
        }
    }

    /// Override the workflow status marker.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.workflow_status = status.into();
        self
    }

    /// The ICP payload being written.
    pub fn icp(&self) -> &IcpData {
        &self.icp
    }

    /// The workflow status being written.
    pub fn workflow_status(&self) -> &str {
        &self.workflow_status
    }

    /// The `company_report` column value.
    pub fn to_company_report(&self) -> Result<Value> {
        let mut phase_data = Map::new();
        phase_data.insert(ICP_REPORT_KEY.to_string(), self.icp.to_value()?);
        Ok(json!({
            "phase_data": phase_data,
            "workflow_status": self.workflow_status,
        }))
    }

    /// The request body: `{ "company_report": { ... } }`.
    pub fn to_row_patch(&self) -> Result<Value> {
        Ok(json!({ "company_report": self.to_company_report()? }))
    }
}
