//! Row-level table store client.
//!
//! A small client for PostgREST backends (Supabase projects expose one at
//! `https://<ref>.supabase.co/rest/v1`) plus an in-memory store with the
//! same surface for tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use table_store::{AccessToken, RestStore, RowId, TableStore};
//!
//! let token = AccessToken::parse(project_key)?;
//! let store = RestStore::new("https://<ref>.supabase.co", token)?;
//!
//! let classes = store.list_rows("classes").await?;
//! let removed = store.delete_row("bookings", &RowId::new("b2")).await?;
//! ```

pub mod credentials;
pub mod error;
pub mod memory;
pub mod rest;
pub mod store;
pub mod types;

pub use credentials::AccessToken;
pub use error::{Result, StoreError};
pub use memory::{MemoryStore, StoreCall};
pub use rest::RestStore;
pub use store::TableStore;
pub use types::{row, Row, RowId, ID_COLUMN};
