//! Operations on company profiles.
//!
//! Each operation takes any [`ProfileStore`], so the same code path runs
//! against the REST backend and the in-memory store used in tests.

use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::id::ProfileId;
use crate::payload::{IcpData, ReportUpdate, ICP_REPORT_KEY};
use crate::report_path::ReportPath;
use crate::store::{ProfileStore, REPORT_COLUMN};

/// Phase a project is returned to by [`reset_to_phase_one`].
pub const PHASE_ONE: &str = "phase_1_company_report";

/// Top-level workflow status after a reset.
pub const RESET_WORKFLOW_STATUS: &str = "completed";

/// How an ICP push treats the existing `company_report` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite the whole column with the new report.
    #[default]
    Replace,

    /// Read the column and set only the ICP report and status inside it.
    Merge,
}

/// What an ICP push did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushSummary {
    /// Number of ICP reports in the payload.
    pub icp_count: usize,

    /// Rows the backend reports as changed.
    pub affected_rows: usize,
}

/// Write an ICP payload into the company report of profile `id`.
pub fn push_icp_report(
    store: &dyn ProfileStore,
    id: ProfileId,
    update: &ReportUpdate,
    mode: WriteMode,
) -> Result<PushSummary> {
    let icp = update.icp();
    for label in icp.duplicate_labels() {
        warn!("ICP label {label} appears more than once in the payload");
    }

    let report = match mode {
        WriteMode::Replace => update.to_company_report()?,
        WriteMode::Merge => merged_report(store, id, update)?,
    };

    info!(
        "Writing {} ICP report(s) to company profile {id} ({mode:?})",
        icp.count()
    );
    let outcome = store.update_report(id, &json!({ REPORT_COLUMN: report }))?;
    if outcome.affected_rows == 0 {
        warn!("No company profile matched {id}; nothing was changed");
    } else {
        info!("Updated {} row(s)", outcome.affected_rows);
    }

    Ok(PushSummary {
        icp_count: icp.count(),
        affected_rows: outcome.affected_rows,
    })
}

fn merged_report(store: &dyn ProfileStore, id: ProfileId, update: &ReportUpdate) -> Result<Value> {
    let mut report = existing_report(store, id)?;

    let icp_path = ReportPath::parse(&format!("phase_data.{ICP_REPORT_KEY}"))?;
    icp_path.set(&mut report, update.icp().to_value()?);

    let status_path = ReportPath::parse("workflow_status")?;
    status_path.set(&mut report, Value::String(update.workflow_status().to_string()));

    Ok(report)
}

fn existing_report(store: &dyn ProfileStore, id: ProfileId) -> Result<Value> {
    match store.fetch_report(id)? {
        None => Err(Error::ProfileNotFound(id)),
        Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(report @ Value::Object(_)) => Ok(report),
        Some(other) => Err(Error::UnexpectedShape(format!(
            "{REPORT_COLUMN} of {id} is not an object: {other}"
        ))),
    }
}

/// Where an ICP report was found and how large it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileInspection {
    /// The profile inspected.
    pub profile_id: String,

    /// Top-level keys of `company_report`.
    pub report_keys: Vec<String>,

    /// Keys of `company_report.phase_data`, if it exists.
    pub phase_data_keys: Option<Vec<String>>,

    /// Whether `phase_data.phase_2_icp_report` exists.
    pub has_icp_report: bool,

    /// Whether `phase_data.phase_2_icp_creation` exists.
    pub has_icp_creation: bool,

    /// Whether `phase_data.phase_2` exists.
    pub has_phase_2: bool,

    /// ICP count, when the report is an array or has an `icp_reports` array.
    pub icp_count: Option<usize>,
}

/// Describe the ICP-related structure of profile `id`.
pub fn inspect_profile(store: &dyn ProfileStore, id: ProfileId) -> Result<ProfileInspection> {
    let report = existing_report(store, id)?;
    let keys_of = |value: &Value| -> Option<Vec<String>> {
        value.as_object().map(|map| map.keys().cloned().collect())
    };

    let mut inspection = ProfileInspection {
        profile_id: id.to_string(),
        report_keys: keys_of(&report).unwrap_or_default(),
        ..Default::default()
    };

    let Some(phase_data) = report.get("phase_data").filter(|v| v.is_object()) else {
        return Ok(inspection);
    };

    inspection.phase_data_keys = keys_of(phase_data);
    inspection.has_icp_creation = phase_data.get("phase_2_icp_creation").is_some_and(is_set);
    inspection.has_phase_2 = phase_data.get("phase_2").is_some_and(is_set);

    if let Some(icp_report) = phase_data.get(ICP_REPORT_KEY).filter(|v| is_set(v)) {
        inspection.has_icp_report = true;
        inspection.icp_count = match icp_report {
            Value::Array(items) => Some(items.len()),
            other => other
                .get("icp_reports")
                .and_then(Value::as_array)
                .map(Vec::len),
        };
    }

    Ok(inspection)
}

/// Whether a stored value counts as present: `null`, `false`, `0` and `""`
/// are treated as unset, while empty objects and arrays are present.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Return profile `id` to the end of phase one so ICPs can be regenerated.
///
/// Phase data is kept (an empty object when there was none); only the phase
/// markers and the top-level workflow status change.
pub fn reset_to_phase_one(store: &dyn ProfileStore, id: ProfileId) -> Result<usize> {
    let mut report = existing_report(store, id)?;

    let phase_data = ReportPath::parse("phase_data")?;
    if !phase_data.get(&report).is_some_and(Value::is_object) {
        phase_data.set(&mut report, Value::Object(Map::new()));
    }

    ReportPath::parse("current_phase")?.set(&mut report, json!(PHASE_ONE));
    ReportPath::parse("phases_completed")?.set(&mut report, json!([PHASE_ONE]));

    info!("Resetting company profile {id} to {PHASE_ONE}");
    let outcome = store.update_report(
        id,
        &json!({
            REPORT_COLUMN: report,
            "workflow_status": RESET_WORKFLOW_STATUS,
        }),
    )?;

    if outcome.affected_rows == 0 {
        return Err(Error::ProfileNotFound(id));
    }
    Ok(outcome.affected_rows)
}

/// Load the ICP payload from `path`, or the embedded snapshot when absent.
pub fn load_icp_data(path: Option<&std::path::Path>) -> Result<IcpData> {
    match path {
        Some(path) => IcpData::from_path(path),
        None => Ok(IcpData::default()),
    }
}
