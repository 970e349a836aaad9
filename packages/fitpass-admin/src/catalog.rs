//! Tables the booking app has and the ones it still needs.

use chrono::{Duration, Local};
use serde_json::{json, Value};
use table_store::TableStore;
use tracing::{info, warn};
use uuid::Uuid;

/// Tables the app runs on today.
pub const CORE_TABLES: &[&str] = &["gyms", "classes", "bookings", "profiles", "users"];

/// Tables checked after a full update, planned ones included.
pub const VERIFY_TABLES: &[&str] = &[
    "gyms",
    "classes",
    "bookings",
    "profiles",
    "plans",
    "subscriptions",
    "payments",
    "workouts",
];

/// Tables whose first row is shown in verification output.
pub const SAMPLED_TABLES: &[&str] = &["classes", "bookings", "subscriptions"];

/// A table the app needs but the database may not have yet.
#[derive(Debug, Clone, Copy)]
pub struct PlannedTable {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [&'static str],
    /// Statement sent through the `exec_sql` function.
    pub create_sql: &'static str,
}

pub const PLANNED_TABLES: &[PlannedTable] = &[
    PlannedTable {
        name: "workouts",
        description: "Track completed workouts",
        columns: &[
            "id",
            "class_id",
            "user_id",
            "duration",
            "calories_burned",
            "notes",
            "completed_at",
        ],
        create_sql: "
            CREATE TABLE IF NOT EXISTS workouts (
                id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
                class_id UUID REFERENCES classes(id) ON DELETE CASCADE,
                user_id UUID REFERENCES profiles(id) ON DELETE CASCADE,
                duration INTEGER, -- duration in minutes
                calories_burned INTEGER,
                notes TEXT,
                completed_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            );
        ",
    },
    PlannedTable {
        name: "plans",
        description: "Subscription plans",
        columns: &["id", "name", "price", "duration_days", "description", "features"],
        create_sql: "
            CREATE TABLE IF NOT EXISTS plans (
                id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                price INTEGER NOT NULL, -- price in cents
                duration_days INTEGER NOT NULL,
                description TEXT,
                features JSONB,
                is_active BOOLEAN DEFAULT true,
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            );
        ",
    },
    PlannedTable {
        name: "subscriptions",
        description: "User subscriptions",
        columns: &["id", "user_id", "plan_id", "status", "start_date", "end_date"],
        create_sql: "
            CREATE TABLE IF NOT EXISTS subscriptions (
                id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
                user_id UUID REFERENCES profiles(id) ON DELETE CASCADE,
                plan_id UUID REFERENCES plans(id) ON DELETE CASCADE,
                status VARCHAR(20) DEFAULT 'pending', -- pending, active, cancelled, expired
                start_date DATE NOT NULL,
                end_date DATE NOT NULL,
                stripe_subscription_id VARCHAR(255),
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            );
        ",
    },
    PlannedTable {
        name: "payments",
        description: "Payment records",
        columns: &["id", "user_id", "amount", "status", "stripe_payment_id", "created_at"],
        create_sql: "
            CREATE TABLE IF NOT EXISTS payments (
                id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
                user_id UUID REFERENCES profiles(id) ON DELETE CASCADE,
                subscription_id UUID REFERENCES subscriptions(id) ON DELETE SET NULL,
                booking_id UUID REFERENCES bookings(id) ON DELETE SET NULL,
                amount INTEGER NOT NULL, -- amount in cents
                currency VARCHAR(3) DEFAULT 'USD',
                status VARCHAR(20) DEFAULT 'pending', -- pending, completed, failed, refunded
                stripe_payment_intent_id VARCHAR(255),
                payment_method VARCHAR(50),
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            );
        ",
    },
];

impl PlannedTable {
    /// Example payload shown next to the column list.
    ///
    /// Foreign keys are placeholders; they name what must be filled in.
    pub fn sample_data(&self) -> Value {
        let now = Local::now();
        match self.name {
            "workouts" => json!({
                "id": Uuid::new_v4().to_string(),
                "class_id": "<class id>",
                "user_id": "<profile id>",
                "duration": 60,
                "calories_burned": 350,
                "notes": "Great yoga session!",
                "completed_at": now.to_rfc3339(),
            }),
            "plans" => json!([
                {"id": Uuid::new_v4().to_string(), "name": "Day Pass", "price": 2000, "duration_days": 1, "description": "Single day access"},
                {"id": Uuid::new_v4().to_string(), "name": "Weekly Pass", "price": 10000, "duration_days": 7, "description": "One week unlimited"},
                {"id": Uuid::new_v4().to_string(), "name": "Monthly Pass", "price": 35000, "duration_days": 30, "description": "Full month membership"},
            ]),
            "subscriptions" => json!({
                "id": Uuid::new_v4().to_string(),
                "user_id": "<profile id>",
                "plan_id": "<plan id>",
                "status": "active",
                "start_date": now.date_naive().to_string(),
                "end_date": (now + Duration::days(7)).date_naive().to_string(),
            }),
            "payments" => json!({
                "id": Uuid::new_v4().to_string(),
                "user_id": "<profile id>",
                "amount": 10000,
                "status": "completed",
                "stripe_payment_id": "pi_test_123456",
                "created_at": now.to_rfc3339(),
            }),
            _ => Value::Null,
        }
    }
}

/// Result of asking the database to create one planned table.
#[derive(Debug)]
pub struct TableCreation {
    pub table: &'static str,
    pub outcome: Result<(), String>,
}

/// Create every planned table through the `exec_sql` database function.
///
/// Each table is attempted on its own; a failure is recorded and the next
/// table is still tried.
pub async fn create_planned_tables<S>(store: &S) -> Vec<TableCreation>
where
    S: TableStore + ?Sized,
{
    let mut results = Vec::with_capacity(PLANNED_TABLES.len());
    for table in PLANNED_TABLES {
        let outcome = store
            .call_rpc("exec_sql", &json!({ "sql": table.create_sql }))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string());
        match &outcome {
            Ok(()) => info!(table = table.name, "Created table"),
            Err(error) => warn!(table = table.name, %error, "Table creation failed"),
        }
        results.push(TableCreation {
            table: table.name,
            outcome,
        });
    }
    results
}
