//! Discover which tables the project exposes.
//!
//! The preferred path asks the database itself through a `sql` function.
//! Most projects don't define one, so the fallback reads one row from each
//! of a list of likely table names and keeps the ones that answer.

use serde_json::{json, Value};
use table_store::{Result, Row, TableStore};
use tracing::debug;

/// Table names a fitness-booking app tends to have.
pub const COMMON_TABLES: &[&str] = &[
    "users",
    "profiles",
    "memberships",
    "passes",
    "activities",
    "workouts",
    "sessions",
    "bookings",
    "classes",
    "trainers",
    "payments",
    "subscriptions",
    "check_ins",
];

/// Tables the app-builder platform may have added.
pub const PLATFORM_TABLES: &[&str] = &[
    "lovable_config",
    "lovable_projects",
    "lovable_deployments",
    "_lovable_metadata",
    "project_settings",
];

const LIST_TABLES_SQL: &str = "
        SELECT table_name
        FROM information_schema.tables
        WHERE table_schema = 'public'
        AND table_type = 'BASE TABLE'
        ORDER BY table_name;
        ";

/// Rows shown per table found by probing.
pub const SAMPLE_SIZE: usize = 5;

/// Ask the database for its public base tables, ordered by name.
///
/// An empty list means the query ran but returned nothing usable.
pub async fn list_public_tables<S>(store: &S) -> Result<Vec<String>>
where
    S: TableStore + ?Sized,
{
    let result = store
        .call_rpc("sql", &json!({ "query": LIST_TABLES_SQL }))
        .await?;
    Ok(table_names(&result))
}

fn table_names(result: &Value) -> Vec<String> {
    result
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|r| r.get("table_name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// A table that answered a probe.
#[derive(Debug, Clone)]
pub struct ProbedTable {
    pub name: &'static str,
    pub rows: Vec<Row>,
}

/// Read up to `sample` rows from each candidate; keep the tables that answer.
///
/// Errors mean "not there or not readable" and are skipped.
pub async fn probe_tables<S>(store: &S, candidates: &[&'static str], sample: usize) -> Vec<ProbedTable>
where
    S: TableStore + ?Sized,
{
    let mut found = Vec::new();
    for &name in candidates {
        match store.sample_rows(name, sample).await {
            Ok(rows) => found.push(ProbedTable { name, rows }),
            Err(e) => debug!(table = name, error = %e, "Probe skipped table"),
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_store::{row, MemoryStore};

    #[test]
    fn test_table_names_ignores_odd_rows() {
        let result = json!([{"table_name": "bookings"}, {"other": 1}, {"table_name": "classes"}]);
        assert_eq!(table_names(&result), vec!["bookings", "classes"]);
        assert!(table_names(&json!({"table_name": "x"})).is_empty());
    }

    #[tokio::test]
    async fn test_list_public_tables_via_function() {
        let store = MemoryStore::new().with_rpc_response(
            "sql",
            json!([{"table_name": "bookings"}, {"table_name": "classes"}]),
        );
        assert_eq!(
            list_public_tables(&store).await.unwrap(),
            vec!["bookings", "classes"]
        );
    }

    #[tokio::test]
    async fn test_list_public_tables_without_function() {
        assert!(list_public_tables(&MemoryStore::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_probe_keeps_answering_tables() {
        let rows = (0..8).map(|i| row(json!({"id": i}))).collect();
        let store = MemoryStore::new()
            .with_table("bookings", rows)
            .with_table("classes", vec![])
            .with_table("profiles", vec![]);
        store.fail_list("profiles");

        let found = probe_tables(&store, COMMON_TABLES, SAMPLE_SIZE).await;

        let names: Vec<&str> = found.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["bookings", "classes"]);
        assert_eq!(found[0].rows.len(), SAMPLE_SIZE);
    }
}
