//! The capability surface every table store offers.
//!
//! Kept deliberately narrow (`list_rows`, `insert_rows`, `delete_row`) so
//! that anything built on top can run against the in-memory store in tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::types::{Row, RowId};

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read every row of a table, in the order the store returns them.
    async fn list_rows(&self, table: &str) -> Result<Vec<Row>>;

    /// Read at most `limit` rows of a table.
    async fn sample_rows(&self, table: &str, limit: usize) -> Result<Vec<Row>> {
        let mut rows = self.list_rows(table).await?;
        rows.truncate(limit);
        Ok(rows)
    }

    /// Insert rows and return them as stored, including generated ids.
    async fn insert_rows(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>>;

    /// Insert one row and return it as stored.
    async fn insert_row(&self, table: &str, row: Row) -> Result<Row> {
        self.insert_rows(table, std::slice::from_ref(&row))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::EmptyInsert {
                table: table.to_string(),
            })
    }

    /// Delete the row whose `id` equals `id`.
    ///
    /// Returns how many rows the store removed; zero means the row was
    /// already gone.
    async fn delete_row(&self, table: &str, id: &RowId) -> Result<usize>;

    /// Invoke a database function by name.
    async fn call_rpc(&self, function: &str, _params: &Value) -> Result<Value> {
        Err(StoreError::Unsupported(format!("rpc {function}")))
    }
}
