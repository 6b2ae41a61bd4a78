//! Company profile storage.
//!
//! [`ProfileStore`] is the seam between the operations in [`crate::ops`] and
//! the database. [`RestStore`] talks to PostgREST over HTTP; [`MemoryStore`]
//! keeps rows in memory and records every update it receives.

pub mod memory;
pub mod rest;

use serde_json::Value;

use crate::error::Result;
use crate::id::ProfileId;

pub use memory::MemoryStore;
pub use rest::RestStore;

/// Column holding the nested company report.
pub const REPORT_COLUMN: &str = "company_report";

/// Result of an update request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOutcome {
    /// Rows the backend reports as changed.
    pub affected_rows: usize,

    /// The changed rows as returned by the backend.
    pub rows: Vec<Value>,
}

impl UpdateOutcome {
    /// Build an outcome from the rows a backend returned.
    pub fn from_rows(rows: Vec<Value>) -> Self {
        Self {
            affected_rows: rows.len(),
            rows,
        }
    }
}

/// Access to rows of the company profile table.
pub trait ProfileStore {
    /// Set the columns in `patch` on the row whose `id` equals `id`.
    ///
    /// Exactly one request is issued, filtered only by the exact identifier.
    /// An identifier that matches no row changes nothing and yields an
    /// outcome with zero affected rows.
    fn update_report(&self, id: ProfileId, patch: &Value) -> Result<UpdateOutcome>;

    /// Read the `company_report` column of one row.
    ///
    /// Returns `None` when no row has the identifier. A row whose column is
    /// empty yields `Some(Value::Null)`.
    fn fetch_report(&self, id: ProfileId) -> Result<Option<Value>>;
}
