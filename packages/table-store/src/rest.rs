//! PostgREST-backed table store.
//!
//! Talks to `{base_url}/rest/v1` with the project key sent both as the
//! `apikey` header and as the bearer token.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::credentials::AccessToken;
use crate::error::{Result, StoreError};
use crate::store::TableStore;
use crate::types::{Row, RowId, ID_COLUMN};

/// Ask PostgREST to echo affected rows back in the response body.
const RETURN_REPRESENTATION: &str = "return=representation";

/// Postgres "undefined_table" and PostgREST's schema-cache miss.
const MISSING_TABLE_CODES: &[&str] = &["42P01", "PGRST205"];

#[derive(Clone)]
pub struct RestStore {
    http_client: Client,
    rest_url: String,
    token: AccessToken,
}

impl RestStore {
    /// Create a store for a project base URL such as `https://<ref>.supabase.co`.
    pub fn new(base_url: impl Into<String>, token: AccessToken) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(StoreError::Config(format!(
                "base URL must be http(s): {base_url}"
            )));
        }

        Ok(Self {
            http_client: Client::new(),
            rest_url: format!("{base_url}/rest/v1"),
            token,
        })
    }

    /// Apply a per-request timeout to every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// The REST root, e.g. `https://<ref>.supabase.co/rest/v1`.
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rpc/{}", self.rest_url, function)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(request.headers(self.token.headers()?))
    }

    async fn rows(&self, table: &str, response: Response) -> Result<Vec<Row>> {
        let response = check(response, Some(table)).await?;
        let rows: Vec<Row> = response.json().await?;
        Ok(rows)
    }
}

#[async_trait]
impl TableStore for RestStore {
    async fn list_rows(&self, table: &str) -> Result<Vec<Row>> {
        debug!(table, "Listing rows");
        let response = self
            .authorized(self.http_client.get(self.table_url(table)))?
            .query(&[("select", "*")])
            .send()
            .await?;
        self.rows(table, response).await
    }

    async fn sample_rows(&self, table: &str, limit: usize) -> Result<Vec<Row>> {
        debug!(table, limit, "Sampling rows");
        let response = self
            .authorized(self.http_client.get(self.table_url(table)))?
            .query(&[("select", "*".to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        self.rows(table, response).await
    }

    async fn insert_rows(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>> {
        debug!(table, count = rows.len(), "Inserting rows");
        let response = self
            .authorized(self.http_client.post(self.table_url(table)))?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(rows)
            .send()
            .await?;
        self.rows(table, response).await
    }

    async fn delete_row(&self, table: &str, id: &RowId) -> Result<usize> {
        debug!(table, %id, "Deleting row");
        let response = self
            .authorized(self.http_client.delete(self.table_url(table)))?
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&[(ID_COLUMN, eq_filter(id))])
            .send()
            .await?;
        Ok(self.rows(table, response).await?.len())
    }

    async fn call_rpc(&self, function: &str, params: &Value) -> Result<Value> {
        debug!(function, "Calling database function");
        let response = self
            .authorized(self.http_client.post(self.rpc_url(function)))?
            .json(params)
            .send()
            .await?;
        let response = check(response, None).await?;

        // Void functions answer with an empty body.
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// PostgREST equality filter value for an identifier.
fn eq_filter(id: &RowId) -> String {
    format!("eq.{id}")
}

async fn check(response: Response, table: Option<&str>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_error(status.as_u16(), &body, table))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Map a failed response onto a store error.
///
/// `table` is set for table endpoints; a 404 there means the table is
/// missing, while a 404 from `/rpc` means the function is.
fn classify_error(status: u16, body: &str, table: Option<&str>) -> StoreError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|e| e.code.as_deref());

    if let Some(table) = table {
        if status == 404 || code.is_some_and(|c| MISSING_TABLE_CODES.contains(&c)) {
            return StoreError::TableNotFound {
                table: table.to_string(),
            };
        }
    }

    let message = parsed
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());
    StoreError::Api { status, message }
}
