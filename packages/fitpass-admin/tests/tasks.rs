//! End-to-end runs of the admin tasks against the memory store.

use fitpass_admin::{cmd, AppContext, Config};
use serde_json::{json, Value};
use std::path::Path;
use table_store::{row, MemoryStore, Row, RowId, StoreCall};

fn config(output_dir: &Path, owner_email: Option<&str>) -> Config {
    let output_dir = output_dir.display().to_string();
    let owner_email = owner_email.map(str::to_string);
    Config::from_lookup(move |key| match key {
        "SUPABASE_PROJECT_REF" => Some("testref".to_string()),
        "SUPABASE_KEY" => Some("test-key".to_string()),
        "FITPASS_OUTPUT_DIR" => Some(output_dir.clone()),
        "FITPASS_OWNER_EMAIL" => owner_email.clone(),
        "FITPASS_OWNER_NAME" => Some("Test Owner".to_string()),
        _ => None,
    })
    .unwrap()
}

fn class(id: &str) -> Row {
    row(json!({"id": id, "gym_id": "g1", "title": "Sunrise Yoga", "price": 20, "capacity": 12}))
}

fn booking(id: &str, class_id: &str) -> Row {
    row(json!({"id": id, "class_id": class_id, "user_id": "u1"}))
}

/// The tables the app has today, with one good and one dangling booking.
fn existing_schema() -> MemoryStore {
    MemoryStore::new()
        .with_table("gyms", vec![row(json!({"id": "g1", "name": "Cabo Strong"}))])
        .with_table("classes", vec![class("c1")])
        .with_table("bookings", vec![booking("b1", "c1"), booking("b2", "c2")])
        .with_table("profiles", vec![])
        .with_table("users", vec![])
}

#[tokio::test]
async fn test_update_runs_every_step_when_tables_can_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let store = existing_schema()
        .with_rpc_response("exec_sql", Value::Null)
        .with_table("plans", vec![])
        .with_table("subscriptions", vec![])
        .with_table("payments", vec![])
        .with_table("workouts", vec![]);
    let ctx = AppContext::new(config(dir.path(), Some("owner@example.com")), store);

    let outcome = cmd::update::run(&ctx).await;

    assert_eq!(outcome.sweep.unwrap().removed(), 1);
    assert_eq!(outcome.created_tables.len(), 4);
    let membership = outcome.membership.unwrap();
    assert_eq!(membership.class_id, Some(RowId::new("c1")));

    let profiles = ctx.store.rows("profiles");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["email"], "owner@example.com");
    assert_eq!(RowId::of_row(&profiles[0]), outcome.profile_id);

    // b1 survived, b2 was swept, and the seeded booking was added after
    let bookings = ctx.store.rows("bookings");
    assert_eq!(bookings.len(), 2);
    assert!(bookings.iter().all(|b| b["class_id"] == "c1"));

    assert!(outcome.table_counts.contains(&("plans", Some(3))));
    assert!(outcome.table_counts.contains(&("workouts", Some(1))));
}

#[tokio::test]
async fn test_update_skips_test_data_without_exec_sql() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = AppContext::new(config(dir.path(), Some("owner@example.com")), existing_schema());

    let outcome = cmd::update::run(&ctx).await;

    assert!(outcome.profile_id.is_some());
    assert!(outcome.created_tables.is_empty());
    assert!(outcome.membership.is_none());
    // Planned tables don't exist, so verification reports them unreadable
    assert!(outcome.table_counts.contains(&("plans", None)));
    assert!(outcome.table_counts.contains(&("bookings", Some(1))));
}

#[tokio::test]
async fn test_update_stops_without_owner_email() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = AppContext::new(config(dir.path(), None), existing_schema());

    let outcome = cmd::update::run(&ctx).await;

    assert!(outcome.sweep.is_some());
    assert!(outcome.profile_id.is_none());
    assert!(outcome.table_counts.is_empty());
    assert!(!ctx
        .store
        .calls()
        .iter()
        .any(|c| matches!(c, StoreCall::Rpc { .. })));
}

#[tokio::test]
async fn test_update_continues_after_failed_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let store = existing_schema();
    store.fail_list("classes");
    let ctx = AppContext::new(config(dir.path(), Some("owner@example.com")), store);

    let outcome = cmd::update::run(&ctx).await;

    assert!(outcome.sweep.is_none());
    assert_eq!(ctx.store.delete_count(), 0);
    assert_eq!(ctx.store.rows("bookings").len(), 2);
    assert!(outcome.profile_id.is_some());
}

#[tokio::test]
async fn test_manual_updates_sweep_seed_and_write_scripts() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = AppContext::new(config(dir.path(), None), existing_schema());

    let outcome = cmd::manual::run(&ctx).await;

    assert_eq!(ctx.store.ids("bookings"), vec![RowId::new("b1")]);
    assert_eq!(outcome.sweep.unwrap().valid(), 1);

    let gym = outcome.gym.unwrap();
    assert_eq!(ctx.store.rows("gyms").len(), 2);
    assert_eq!(ctx.store.rows("classes").len(), 3);
    assert_eq!(gym.class_ids.len(), 2);

    assert_eq!(outcome.scripts_written.len(), 4);
    for name in ["create_workouts.sql", "create_plans.sql", "create_subscriptions.sql", "create_payments.sql"] {
        assert!(dir.path().join(name).exists(), "{name} not written");
    }
}

#[tokio::test]
async fn test_manual_updates_survive_missing_gyms_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new()
        .with_table("classes", vec![class("c1")])
        .with_table("bookings", vec![booking("b1", "c1")]);
    let ctx = AppContext::new(config(dir.path(), None), store);

    let outcome = cmd::manual::run(&ctx).await;

    assert!(outcome.gym.is_none());
    assert_eq!(outcome.scripts_written.len(), 4);
}

#[tokio::test]
async fn test_analyze_uses_sql_function_when_available() {
    let dir = tempfile::tempdir().unwrap();
    let store = existing_schema().with_rpc_response(
        "sql",
        json!([{"table_name": "bookings"}, {"table_name": "classes"}]),
    );
    let ctx = AppContext::new(config(dir.path(), None), store);

    let analysis = cmd::analyze::run(&ctx).await;

    assert_eq!(
        analysis.listed,
        Some(vec!["bookings".to_string(), "classes".to_string()])
    );
    assert!(analysis.probed.is_empty());
}

#[tokio::test]
async fn test_analyze_falls_back_to_probing() {
    let dir = tempfile::tempdir().unwrap();
    let store = existing_schema().with_table("project_settings", vec![row(json!({"id": 1}))]);
    let ctx = AppContext::new(config(dir.path(), None), store);

    let analysis = cmd::analyze::run(&ctx).await;

    assert!(analysis.listed.is_none());
    assert_eq!(analysis.probed, vec!["users", "profiles", "bookings", "classes"]);
    assert_eq!(analysis.platform, vec!["project_settings"]);
    // Analysis never writes
    assert!(!ctx.store.calls().iter().any(|c| matches!(
        c,
        StoreCall::Insert { .. } | StoreCall::Delete { .. }
    )));
}

#[tokio::test]
async fn test_verification_reports_tables_and_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("create_plans.sql"), "-- plans").unwrap();
    let store = existing_schema();
    store.fail_list("users");
    let ctx = AppContext::new(config(dir.path(), Some("owner@example.com")), store);

    let summary = cmd::verify::run(&ctx).await;

    assert!(summary.table_counts.contains(&("bookings", Some(2))));
    assert!(summary.table_counts.contains(&("users", None)));
    assert_eq!(summary.artifacts_found, vec!["create_plans.sql"]);
    assert_eq!(summary.artifacts_missing.len(), 6);
    // Verification is read-only
    assert_eq!(ctx.store.delete_count(), 0);
}
