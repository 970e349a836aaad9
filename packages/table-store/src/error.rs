//! Error types for table store operations.

use thiserror::Error;

/// Result type for table store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Table store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network error (connection failed, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the store
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The addressed table does not exist or is not exposed
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    /// An insert was acknowledged without returning the inserted rows
    #[error("insert into {table} returned no rows")]
    EmptyInsert { table: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Operation not offered by this store
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Configuration error (bad base URL, client construction)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether the error means the table is absent rather than unreachable.
    pub fn is_missing_table(&self) -> bool {
        matches!(self, StoreError::TableNotFound { .. })
    }
}
