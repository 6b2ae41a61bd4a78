//! PostgREST-backed profile store.

use log::debug;
use reqwest::blocking::{Client, Request, RequestBuilder};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use super::{ProfileStore, UpdateOutcome, REPORT_COLUMN};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::id::ProfileId;

const PREFER: &str = "Prefer";
const API_KEY: &str = "apikey";

/// Blocking HTTP client for the company profile table.
#[derive(Debug)]
pub struct RestStore {
    config: StoreConfig,
    client: Client,
}

impl RestStore {
    /// Create a store with a client honouring the configured timeout.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { config, client })
    }

    /// Create a store around an already configured client.
    pub fn with_client(config: StoreConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the `PATCH` request that sets `patch` on the row `id`.
    pub fn build_update(&self, id: ProfileId, patch: &Value) -> Result<Request> {
        let request = self
            .authorized(self.client.patch(self.config.table_endpoint()))
            .query(&[("id", format!("eq.{id}"))])
            .header(PREFER, "return=representation")
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(serde_json::to_vec(patch)?)
            .build()?;
        Ok(request)
    }

    /// Build the `GET` request reading the report column of row `id`.
    pub fn build_fetch(&self, id: ProfileId) -> Result<Request> {
        let request = self
            .authorized(self.client.get(self.config.table_endpoint()))
            .query(&[
                ("id", format!("eq.{id}")),
                ("select", REPORT_COLUMN.to_string()),
            ])
            .build()?;
        Ok(request)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(API_KEY, self.config.service_key.as_str())
            .bearer_auth(&self.config.service_key)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
    }

    /// Send a request and decode the row array PostgREST answers with.
    fn execute_rows(&self, request: Request) -> Result<Vec<Value>> {
        debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request)?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&text)? {
            Value::Array(rows) => Ok(rows),
            other => Err(Error::UnexpectedShape(format!(
                "expected a JSON array of rows, got {other}"
            ))),
        }
    }
}

impl ProfileStore for RestStore {
    fn update_report(&self, id: ProfileId, patch: &Value) -> Result<UpdateOutcome> {
        let request = self.build_update(id, patch)?;
        let rows = self.execute_rows(request)?;
        Ok(UpdateOutcome::from_rows(rows))
    }

    fn fetch_report(&self, id: ProfileId) -> Result<Option<Value>> {
        let request = self.build_fetch(id)?;
        let mut rows = self.execute_rows(request)?;
        if rows.is_empty() {
            return Ok(None);
        }

        let mut row = rows.swap_remove(0);
        let report = row
            .as_object_mut()
            .and_then(|columns| columns.remove(REPORT_COLUMN))
            .unwrap_or(Value::Null);
        Ok(Some(report))
    }
}
