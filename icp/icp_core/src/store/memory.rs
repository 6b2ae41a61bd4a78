//! In-memory profile store.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{ProfileStore, UpdateOutcome, REPORT_COLUMN};
use crate::error::{Error, Result};
use crate::id::ProfileId;

/// A profile table held in memory.
///
/// Updates set top-level columns the way PostgREST does, and every update
/// request is recorded whether or not it matched a row.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<ProfileId, Map<String, Value>>>,
    updates: Mutex<Vec<(ProfileId, Value)>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row with the given `company_report` column.
    pub fn insert(&self, id: ProfileId, report: Value) {
        let mut row = Map::new();
        row.insert("id".to_string(), Value::String(id.to_string()));
        row.insert(REPORT_COLUMN.to_string(), report);
        lock(&self.rows).insert(id, row);
    }

    /// A full copy of one row, if present.
    pub fn row(&self, id: ProfileId) -> Option<Value> {
        lock(&self.rows).get(&id).cloned().map(Value::Object)
    }

    /// Number of rows in the store.
    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    /// Whether the store has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every update request received, in order.
    pub fn updates(&self) -> Vec<(ProfileId, Value)> {
        lock(&self.updates).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ProfileStore for MemoryStore {
    fn update_report(&self, id: ProfileId, patch: &Value) -> Result<UpdateOutcome> {
        let columns = patch.as_object().ok_or_else(|| {
            Error::UnexpectedShape("update body must be a JSON object".to_string())
        })?;
        lock(&self.updates).push((id, patch.clone()));

        let mut rows = lock(&self.rows);
        let Some(row) = rows.get_mut(&id) else {
            return Ok(UpdateOutcome::default());
        };

        for (column, value) in columns {
            row.insert(column.clone(), value.clone());
        }
        Ok(UpdateOutcome::from_rows(vec![Value::Object(row.clone())]))
    }

    fn fetch_report(&self, id: ProfileId) -> Result<Option<Value>> {
        Ok(lock(&self.rows)
            .get(&id)
            .map(|row| row.get(REPORT_COLUMN).cloned().unwrap_or(Value::Null)))
    }
}
