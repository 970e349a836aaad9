//! Plain-text renderings of rows and sweep results.

use serde_json::Value;
use table_store::Row;

use crate::config::Config;
use crate::sweep::{Checked, SweepReport, Verdict};

/// Render a value the way a person reads it: strings bare, the rest as JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// `key: value` lines for one record, indented two spaces.
pub fn record_lines(row: &Row) -> Vec<String> {
    row.iter()
        .map(|(key, value)| format!("  {key}: {}", format_value(value)))
        .collect()
}

pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn pretty_row(row: &Row) -> String {
    pretty(&Value::Object(row.clone()))
}

pub fn column_names(row: &Row) -> Vec<&str> {
    row.keys().map(String::as_str).collect()
}

/// `12345` as `12,345`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One line per classified row, e.g. `b2 -> c2 (deleted)`.
pub fn sweep_line(checked: &Checked) -> String {
    let id = checked
        .id
        .as_ref()
        .map_or_else(|| "<no id>".to_string(), ToString::to_string);
    let reference = checked
        .reference
        .as_ref()
        .map_or_else(|| "<none>".to_string(), ToString::to_string);
    let outcome = match &checked.verdict {
        Verdict::Valid => "valid".to_string(),
        Verdict::Deleted => "deleted".to_string(),
        Verdict::NothingMatched => "delete matched no rows".to_string(),
        Verdict::DeleteFailed(e) => format!("delete failed: {e}"),
    };
    format!("{id} -> {reference} ({outcome})")
}

/// Closing line of a sweep.
pub fn sweep_summary(report: &SweepReport) -> String {
    let mut summary = format!(
        "Cleaned {} invalid {} ({} checked, {} valid)",
        report.removed(),
        report.target.child_table,
        report.children_read(),
        report.valid()
    );
    if report.unmatched() > 0 {
        summary.push_str(&format!(", {} deletes matched no rows", report.unmatched()));
    }
    if report.failed() > 0 {
        summary.push_str(&format!(", {} could not be deleted", report.failed()));
    }
    summary
}

/// Queries the front end will run against these tables.
pub const KEY_QUERIES: &[(&str, &str)] = &[
    ("Get all classes", "SELECT * FROM classes;"),
    (
        "Get bookings for user",
        "SELECT * FROM bookings WHERE user_id = [current_user_id];",
    ),
    (
        "Get user subscriptions",
        "SELECT * FROM subscriptions WHERE user_id = [current_user_id];",
    ),
    (
        "Get classes with gym info",
        "SELECT classes.*, gyms.name as gym_name, gyms.location
FROM classes
JOIN gyms ON classes.gym_id = gyms.id
ORDER BY classes.schedule;",
    ),
    (
        "Get user bookings with details",
        "SELECT bookings.*, classes.title, classes.schedule, gyms.name as gym_name
FROM bookings
JOIN classes ON bookings.class_id = classes.id
JOIN gyms ON classes.gym_id = gyms.id
WHERE bookings.user_id = [current_user_id]
ORDER BY bookings.created_at DESC;",
    ),
    (
        "Get active user subscriptions",
        "SELECT subscriptions.*, plans.name, plans.price, plans.duration_days
FROM subscriptions
JOIN plans ON subscriptions.plan_id = plans.id
WHERE subscriptions.user_id = [current_user_id]
AND subscriptions.status = 'active';",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Complete,
    Ready,
    Pending,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Complete => "COMPLETE",
            Status::Ready => "READY",
            Status::Pending => "PENDING",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusItem {
    pub item: &'static str,
    pub status: Status,
    pub description: String,
}

/// Integration checklist for the hand-off to the front end.
pub fn integration_status(config: &Config) -> Vec<StatusItem> {
    let account = match config.owner.email.as_deref() {
        Some(email) => format!("Need to create {email} via Supabase Auth"),
        None => "Need to create the owner account via Supabase Auth".to_string(),
    };
    let entry = |item, status, description: &str| StatusItem {
        item,
        status,
        description: description.to_string(),
    };

    vec![
        entry("Database Cleanup", Status::Complete, "Invalid bookings removed, valid data verified"),
        entry("Test Data", Status::Complete, "Added gyms, classes, and sample booking"),
        entry(
            "SQL Scripts",
            Status::Ready,
            "Generated for missing tables (workouts, plans, subscriptions, payments)",
        ),
        entry("Lovable Config", Status::Ready, "Supabase client configuration created"),
        entry(
            "React Components",
            Status::Ready,
            "Full app component with booking and subscription features",
        ),
        StatusItem {
            item: "User Account",
            status: Status::Pending,
            description: account,
        },
        entry("Table Creation", Status::Pending, "Execute SQL scripts in Supabase dashboard"),
        entry("Deployment", Status::Pending, "Deploy to Lovable.io project"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use table_store::{row, RowId};

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("Yoga")), "Yoga");
        assert_eq!(format_value(&json!(25)), "25");
        assert_eq!(format_value(&Value::Null), "None");
        assert_eq!(format_value(&json!(["a"])), r#"["a"]"#);
    }

    #[test]
    fn test_record_lines() {
        let r = row(json!({"id": "c1", "capacity": 15}));
        let lines = record_lines(&r);
        assert!(lines.contains(&"  id: c1".to_string()));
        assert!(lines.contains(&"  capacity: 15".to_string()));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_sweep_line() {
        let checked = Checked {
            id: Some(RowId::new("b2")),
            reference: Some(RowId::new("c2")),
            verdict: Verdict::Deleted,
        };
        assert_eq!(sweep_line(&checked), "b2 -> c2 (deleted)");

        let checked = Checked {
            id: None,
            reference: None,
            verdict: Verdict::DeleteFailed("row has no usable id".into()),
        };
        assert_eq!(
            sweep_line(&checked),
            "<no id> -> <none> (delete failed: row has no usable id)"
        );
    }

    #[test]
    fn test_sweep_summary_counts_unmatched_deletes() {
        let checked = |id: &str, verdict| Checked {
            id: Some(RowId::new(id)),
            reference: Some(RowId::new("c9")),
            verdict,
        };
        let report = SweepReport {
            target: crate::sweep::SweepTarget::bookings_to_classes(),
            parent_ids: vec![],
            checked: vec![
                checked("b1", Verdict::Deleted),
                checked("b2", Verdict::NothingMatched),
            ],
        };

        assert_eq!(
            sweep_summary(&report),
            "Cleaned 1 invalid bookings (2 checked, 0 valid), 1 deletes matched no rows"
        );
        assert_eq!(
            sweep_line(&report.checked[1]),
            "b2 -> c9 (delete matched no rows)"
        );
    }

    #[test]
    fn test_owner_email_in_status() {
        let mut config = Config::from_lookup(|key| match key {
            "SUPABASE_PROJECT_REF" => Some("abc".into()),
            "SUPABASE_KEY" => Some("key".into()),
            _ => None,
        })
        .unwrap();
        let pending = |c: &Config| {
            integration_status(c)
                .into_iter()
                .find(|s| s.item == "User Account")
                .unwrap()
                .description
        };
        assert!(pending(&config).contains("owner account"));

        config.owner.email = Some("owner@example.com".into());
        assert!(pending(&config).contains("owner@example.com"));
    }
}
