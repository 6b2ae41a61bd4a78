//! Dotted paths into nested JSON reports.
//!
//! A path such as `phase_data.phase_2_icp_report` names a value inside the
//! `company_report` column. Paths only address object keys; array indexing
//! is not needed for report documents.
//!
//! # Examples
//!
//! ```
//! use icp_core::report_path::ReportPath;
//! use serde_json::json;
//!
//! let path = ReportPath::parse("phase_data.phase_2_icp_report").unwrap();
//! let mut report = json!({});
//! path.set(&mut report, json!({ "icp_reports": [] }));
//! assert_eq!(path.get(&report), Some(&json!({ "icp_reports": [] })));
//! ```

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A parsed dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPath {
    segments: Vec<String>,
}

impl ReportPath {
    /// Parse a dotted path. Empty paths and empty segments are rejected.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::InvalidPath("path is empty".to_string()));
        }

        let mut segments = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(Error::InvalidPath(format!("empty segment in '{path}'")));
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// The individual keys of this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the value at this path, if every key along it exists.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, key| current.as_object()?.get(key))
    }

    /// Set the value at this path.
    ///
    /// Missing intermediate objects are created. An intermediate value that
    /// is not an object is replaced by an empty object.
    pub fn set(&self, root: &mut Value, value: Value) {
        let (last, parents) = match self.segments.split_last() {
            Some(split) => split,
            None => return,
        };

        let mut current = root;
        for key in parents {
            current = ensure_object(current)
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        ensure_object(current).insert(last.clone(), value);
    }

    /// Remove and return the value at this path.
    pub fn remove(&self, root: &mut Value) -> Option<Value> {
        let (last, parents) = self.segments.split_last()?;

        let mut current = root;
        for key in parents {
            current = current.as_object_mut()?.get_mut(key)?;
        }

        current.as_object_mut()?.remove(last)
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just made an object"),
    }
}

impl FromStr for ReportPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ReportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
