//! Row and identifier types shared by every store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Primary key column shared by every table this client addresses.
pub const ID_COLUMN: &str = "id";

/// A single record: column name to value.
pub type Row = serde_json::Map<String, Value>;

/// Build a row from a JSON object literal. Non-objects yield an empty row.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

/// Textual form of a row identifier, as the store's `eq.` filter sees it.
///
/// Strings keep their content and numbers their decimal rendering. Nulls,
/// booleans, arrays and objects are not identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Read `column` from `row` as an identifier.
    pub fn of(row: &Row, column: &str) -> Option<Self> {
        row.get(column).and_then(Self::from_value)
    }

    /// The row's own `id`.
    pub fn of_row(row: &Row) -> Option<Self> {
        Self::of(row, ID_COLUMN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
