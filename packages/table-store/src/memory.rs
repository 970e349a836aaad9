//! In-memory table store for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::store::TableStore;
use crate::types::{Row, RowId, ID_COLUMN};

/// Record of a call made to the memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List { table: String },
    Insert { table: String, count: usize },
    Delete { table: String, id: RowId },
    Rpc { function: String },
}

/// In-memory tables keyed by name, rows kept in insertion order.
///
/// Unknown tables answer with [`StoreError::TableNotFound`], inserts
/// assign a UUID `id` when the row has none, and failures can be injected
/// per table or per row for exercising error paths. Data is lost on drop.
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, Vec<Row>>>,
    rpc_responses: RwLock<HashMap<String, Value>>,
    failing_lists: RwLock<HashSet<String>>,
    failing_inserts: RwLock<HashSet<String>>,
    failing_deletes: RwLock<HashSet<(String, RowId)>>,
    refused_deletes: RwLock<HashSet<(String, RowId)>>,
    calls: RwLock<Vec<StoreCall>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store with no tables.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(BTreeMap::new()),
            rpc_responses: RwLock::new(HashMap::new()),
            failing_lists: RwLock::new(HashSet::new()),
            failing_inserts: RwLock::new(HashSet::new()),
            failing_deletes: RwLock::new(HashSet::new()),
            refused_deletes: RwLock::new(HashSet::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Builder form of [`MemoryStore::put_table`].
    pub fn with_table(self, table: &str, rows: Vec<Row>) -> Self {
        self.put_table(table, rows);
        self
    }

    /// Create (or replace) a table with the given rows.
    pub fn put_table(&self, table: &str, rows: Vec<Row>) {
        self.tables
            .write()
            .unwrap()
            .insert(table.to_string(), rows);
    }

    /// Canned response for a database function.
    pub fn with_rpc_response(self, function: &str, response: Value) -> Self {
        self.rpc_responses
            .write()
            .unwrap()
            .insert(function.to_string(), response);
        self
    }

    /// Make every read of `table` fail.
    pub fn fail_list(&self, table: &str) {
        self.failing_lists.write().unwrap().insert(table.to_string());
    }

    /// Make every insert into `table` fail.
    pub fn fail_insert(&self, table: &str) {
        self.failing_inserts
            .write()
            .unwrap()
            .insert(table.to_string());
    }

    /// Make deleting row `id` of `table` fail.
    pub fn fail_delete(&self, table: &str, id: impl Into<RowId>) {
        self.failing_deletes
            .write()
            .unwrap()
            .insert((table.to_string(), id.into()));
    }

    /// Make deleting row `id` of `table` succeed without removing it, the
    /// way PostgREST answers a delete that a row-level policy filters out.
    pub fn refuse_delete(&self, table: &str, id: impl Into<RowId>) {
        self.refused_deletes
            .write()
            .unwrap()
            .insert((table.to_string(), id.into()));
    }

    /// Current rows of a table (empty if the table does not exist).
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Ids of the current rows of a table, in order.
    pub fn ids(&self, table: &str) -> Vec<RowId> {
        self.rows(table).iter().filter_map(RowId::of_row).collect()
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.read().unwrap().contains_key(table)
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of delete calls issued against any table.
    pub fn delete_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, StoreCall::Delete { .. }))
            .count()
    }

    fn record(&self, call: StoreCall) {
        self.calls.write().unwrap().push(call);
    }

    fn injected(operation: &str, table: &str) -> StoreError {
        StoreError::Api {
            status: 500,
            message: format!("injected {operation} failure on {table}"),
        }
    }

    fn missing(table: &str) -> StoreError {
        StoreError::TableNotFound {
            table: table.to_string(),
        }
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn list_rows(&self, table: &str) -> Result<Vec<Row>> {
        self.record(StoreCall::List {
            table: table.to_string(),
        });
        if self.failing_lists.read().unwrap().contains(table) {
            return Err(Self::injected("list", table));
        }
        self.tables
            .read()
            .unwrap()
            .get(table)
            .cloned()
            .ok_or_else(|| Self::missing(table))
    }

    async fn insert_rows(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>> {
        self.record(StoreCall::Insert {
            table: table.to_string(),
            count: rows.len(),
        });
        if self.failing_inserts.read().unwrap().contains(table) {
            return Err(Self::injected("insert", table));
        }

        let mut tables = self.tables.write().unwrap();
        let stored = tables.get_mut(table).ok_or_else(|| Self::missing(table))?;

        let inserted: Vec<Row> = rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                if !row.contains_key(ID_COLUMN) {
                    row.insert(
                        ID_COLUMN.to_string(),
                        Value::String(Uuid::new_v4().to_string()),
                    );
                }
                row
            })
            .collect();
        stored.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn delete_row(&self, table: &str, id: &RowId) -> Result<usize> {
        self.record(StoreCall::Delete {
            table: table.to_string(),
            id: id.clone(),
        });
        if self
            .failing_deletes
            .read()
            .unwrap()
            .contains(&(table.to_string(), id.clone()))
        {
            return Err(Self::injected("delete", table));
        }
        if self
            .refused_deletes
            .read()
            .unwrap()
            .contains(&(table.to_string(), id.clone()))
        {
            return Ok(0);
        }

        let mut tables = self.tables.write().unwrap();
        let stored = tables.get_mut(table).ok_or_else(|| Self::missing(table))?;
        let before = stored.len();
        stored.retain(|row| RowId::of_row(row).as_ref() != Some(id));
        Ok(before - stored.len())
    }

    async fn call_rpc(&self, function: &str, _params: &Value) -> Result<Value> {
        self.record(StoreCall::Rpc {
            function: function.to_string(),
        });
        self.rpc_responses
            .read()
            .unwrap()
            .get(function)
            .cloned()
            .ok_or_else(|| StoreError::Api {
                status: 404,
                message: format!("function {function} not found"),
            })
    }
}
