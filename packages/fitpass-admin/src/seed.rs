//! Sample rows for the booking app.
//!
//! Payloads are fixed literals; only ids and dates are computed. Builders
//! return plain rows so they can be checked without a store, and the
//! `seed_*` functions insert them in dependency order.

use chrono::{DateTime, Duration, Local};
use serde_json::json;
use table_store::{row, Result, Row, RowId, StoreError, TableStore};
use tracing::info;
use uuid::Uuid;

use crate::config::OwnerProfile;

/// Owner profile row with a fresh id. `None` without an email.
pub fn owner_profile(owner: &OwnerProfile, now: DateTime<Local>) -> Option<Row> {
    let email = owner.email.as_deref()?;
    Some(row(json!({
        "id": Uuid::new_v4().to_string(),
        "email": email,
        "full_name": owner.full_name,
        "role": "local",
        "phone": owner.phone,
        "created_at": now.to_rfc3339(),
    })))
}

pub fn plans() -> Vec<Row> {
    vec![
        row(json!({
            "name": "Day Pass",
            "price": 2000,
            "duration_days": 1,
            "description": "Single day access to all gyms",
            "features": ["All gym access", "Group classes", "Basic facilities"],
        })),
        row(json!({
            "name": "Weekly Pass",
            "price": 10000,
            "duration_days": 7,
            "description": "One week unlimited access",
            "features": ["All gym access", "Group classes", "Personal training session", "Towel service"],
        })),
        row(json!({
            "name": "Monthly Pass",
            "price": 35000,
            "duration_days": 30,
            "description": "Full month membership",
            "features": ["All gym access", "Unlimited classes", "3 personal training sessions", "Nutrition consultation"],
        })),
    ]
}

/// Index into [`plans`] of the plan the test subscription uses.
pub const WEEKLY_PLAN: usize = 1;

pub fn subscription(user_id: &RowId, plan_id: &RowId, now: DateTime<Local>) -> Row {
    row(json!({
        "user_id": user_id,
        "plan_id": plan_id,
        "status": "active",
        "start_date": now.date_naive().to_string(),
        "end_date": (now + Duration::days(7)).date_naive().to_string(),
    }))
}

pub fn payment(user_id: &RowId, subscription_id: &RowId) -> Row {
    row(json!({
        "user_id": user_id,
        "subscription_id": subscription_id,
        "amount": 10000,
        "status": "completed",
        "payment_method": "stripe",
    }))
}

pub fn workout(user_id: &RowId, class_id: &RowId) -> Row {
    row(json!({
        "class_id": class_id,
        "user_id": user_id,
        "duration": 60,
        "calories_burned": 350,
        "notes": "Great yoga session! Feel more flexible already.",
    }))
}

pub fn booking(user_id: &RowId, class_id: &RowId) -> Row {
    row(json!({
        "user_id": user_id,
        "class_id": class_id,
        "type": "subscription",
        "payment_status": "completed",
    }))
}

pub fn gym() -> Row {
    row(json!({
        "name": "Ocean View Fitness",
        "location": "Playa del Carmen, Mexico",
        "logo_url": "https://example.com/ocean-view-logo.png",
    }))
}

pub fn classes(gym_id: &RowId, now: DateTime<Local>) -> Vec<Row> {
    vec![
        row(json!({
            "gym_id": gym_id,
            "title": "CrossFit WOD",
            "schedule": (now + Duration::days(1) + Duration::hours(10)).to_rfc3339(),
            "price": 25,
            "capacity": 15,
        })),
        row(json!({
            "gym_id": gym_id,
            "title": "Swimming Lessons",
            "schedule": (now + Duration::days(2) + Duration::hours(14)).to_rfc3339(),
            "price": 30,
            "capacity": 8,
        })),
    ]
}

/// What [`seed_membership_data`] inserted.
#[derive(Debug, Clone, Default)]
pub struct MembershipSeed {
    pub plan_ids: Vec<RowId>,
    pub subscription_id: Option<RowId>,
    /// Set when a class existed to attach the workout and booking to.
    pub class_id: Option<RowId>,
}

/// Steps reported as they complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStep {
    Plans(usize),
    Subscription,
    Payment,
    Workout,
    Booking,
}

/// Insert plans, a subscription and payment for `user_id`, and a workout
/// plus booking against the first existing class.
///
/// Stops at the first failing insert; `on_step` has seen every step that
/// completed before it.
pub async fn seed_membership_data<S>(
    store: &S,
    user_id: &RowId,
    mut on_step: impl FnMut(SeedStep),
) -> Result<MembershipSeed>
where
    S: TableStore + ?Sized,
{
    let now = Local::now();
    let mut seed = MembershipSeed::default();

    let inserted = store.insert_rows("plans", &plans()).await?;
    seed.plan_ids = ids(&inserted, "plans")?;
    on_step(SeedStep::Plans(inserted.len()));

    let plan_id = seed
        .plan_ids
        .get(WEEKLY_PLAN)
        .ok_or_else(|| StoreError::EmptyInsert {
            table: "plans".to_string(),
        })?;
    let subscription_row = store
        .insert_row("subscriptions", subscription(user_id, plan_id, now))
        .await?;
    let subscription_id = id(&subscription_row, "subscriptions")?;
    on_step(SeedStep::Subscription);

    store
        .insert_row("payments", payment(user_id, &subscription_id))
        .await?;
    seed.subscription_id = Some(subscription_id);
    on_step(SeedStep::Payment);

    let first_class = store.sample_rows("classes", 1).await?;
    if let Some(class_id) = first_class.first().and_then(RowId::of_row) {
        store.insert_row("workouts", workout(user_id, &class_id)).await?;
        on_step(SeedStep::Workout);

        store.insert_row("bookings", booking(user_id, &class_id)).await?;
        on_step(SeedStep::Booking);
        seed.class_id = Some(class_id);
    }

    info!(plans = seed.plan_ids.len(), with_class = seed.class_id.is_some(), "Seeded membership data");
    Ok(seed)
}

/// What [`seed_gym_with_classes`] inserted.
#[derive(Debug, Clone)]
pub struct GymSeed {
    pub gym_id: RowId,
    pub gym_name: String,
    pub class_ids: Vec<RowId>,
}

/// Insert one gym and two upcoming classes bound to its generated id.
pub async fn seed_gym_with_classes<S>(store: &S) -> Result<GymSeed>
where
    S: TableStore + ?Sized,
{
    let gym_row = gym();
    let gym_name = gym_row
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let inserted = store.insert_row("gyms", gym_row).await?;
    let gym_id = id(&inserted, "gyms")?;

    let inserted = store
        .insert_rows("classes", &classes(&gym_id, Local::now()))
        .await?;
    let class_ids = ids(&inserted, "classes")?;

    info!(%gym_id, classes = class_ids.len(), "Seeded gym with classes");
    Ok(GymSeed {
        gym_id,
        gym_name,
        class_ids,
    })
}

/// Insert the owner profile. Returns the stored row.
pub async fn seed_owner_profile<S>(store: &S, owner: &OwnerProfile) -> Result<Row>
where
    S: TableStore + ?Sized,
{
    let profile = owner_profile(owner, Local::now())
        .ok_or_else(|| StoreError::Config("FITPASS_OWNER_EMAIL is not set".to_string()))?;
    store.insert_row("profiles", profile).await
}

fn id(row: &Row, table: &str) -> Result<RowId> {
    RowId::of_row(row).ok_or_else(|| StoreError::EmptyInsert {
        table: table.to_string(),
    })
}

fn ids(rows: &[Row], table: &str) -> Result<Vec<RowId>> {
    rows.iter().map(|r| id(r, table)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_store::MemoryStore;

    fn owner() -> OwnerProfile {
        OwnerProfile {
            email: Some("owner@example.com".into()),
            full_name: Some("Test Owner".into()),
            phone: None,
        }
    }

    #[test]
    fn test_owner_profile_needs_email() {
        assert!(owner_profile(&OwnerProfile::default(), Local::now()).is_none());

        let profile = owner_profile(&owner(), Local::now()).unwrap();
        assert_eq!(profile["email"], "owner@example.com");
        assert_eq!(profile["role"], "local");
        assert!(RowId::of_row(&profile).is_some());
    }

    #[test]
    fn test_plan_prices_are_cents() {
        let prices: Vec<i64> = plans().iter().map(|p| p["price"].as_i64().unwrap()).collect();
        assert_eq!(prices, vec![2000, 10000, 35000]);
        assert_eq!(plans()[WEEKLY_PLAN]["duration_days"], 7);
    }

    #[test]
    fn test_subscription_spans_a_week() {
        let now = Local::now();
        let sub = subscription(&RowId::new("u1"), &RowId::new("p2"), now);
        let start = chrono::NaiveDate::parse_from_str(sub["start_date"].as_str().unwrap(), "%Y-%m-%d").unwrap();
        let end = chrono::NaiveDate::parse_from_str(sub["end_date"].as_str().unwrap(), "%Y-%m-%d").unwrap();
        assert_eq!((end - start).num_days(), 7);
        assert_eq!(sub["plan_id"], "p2");
    }

    #[test]
    fn test_classes_reference_gym() {
        let gym_id = RowId::new("g1");
        for class in classes(&gym_id, Local::now()) {
            assert_eq!(class["gym_id"], "g1");
        }
    }

    fn membership_store() -> MemoryStore {
        MemoryStore::new()
            .with_table("plans", vec![])
            .with_table("subscriptions", vec![])
            .with_table("payments", vec![])
            .with_table("workouts", vec![])
            .with_table("bookings", vec![])
    }

    #[tokio::test]
    async fn test_membership_seed_with_class() {
        let store = membership_store().with_table("classes", vec![row(json!({"id": "c1"}))]);
        let mut steps = Vec::new();

        let seed = seed_membership_data(&store, &RowId::new("u1"), |s| steps.push(s))
            .await
            .unwrap();

        assert_eq!(seed.plan_ids.len(), 3);
        assert_eq!(seed.class_id, Some(RowId::new("c1")));
        assert_eq!(
            steps,
            vec![
                SeedStep::Plans(3),
                SeedStep::Subscription,
                SeedStep::Payment,
                SeedStep::Workout,
                SeedStep::Booking,
            ]
        );
        let subscription = &store.rows("subscriptions")[0];
        assert_eq!(RowId::of(subscription, "plan_id").as_ref(), Some(&seed.plan_ids[WEEKLY_PLAN]));
        assert_eq!(store.rows("bookings")[0]["class_id"], "c1");
    }

    #[tokio::test]
    async fn test_membership_seed_without_class() {
        let store = membership_store().with_table("classes", vec![]);

        let seed = seed_membership_data(&store, &RowId::new("u1"), |_| {}).await.unwrap();

        assert!(seed.class_id.is_none());
        assert!(store.rows("workouts").is_empty());
        assert_eq!(store.rows("payments").len(), 1);
    }

    #[tokio::test]
    async fn test_membership_seed_stops_at_first_failure() {
        let store = membership_store().with_table("classes", vec![]);
        store.fail_insert("payments");
        let mut steps = Vec::new();

        let result = seed_membership_data(&store, &RowId::new("u1"), |s| steps.push(s)).await;

        assert!(result.is_err());
        assert_eq!(steps, vec![SeedStep::Plans(3), SeedStep::Subscription]);
    }

    #[tokio::test]
    async fn test_gym_seed_binds_classes() {
        let store = MemoryStore::new()
            .with_table("gyms", vec![])
            .with_table("classes", vec![]);

        let seed = seed_gym_with_classes(&store).await.unwrap();

        assert_eq!(seed.gym_name, "Ocean View Fitness");
        assert_eq!(seed.class_ids.len(), 2);
        for class in store.rows("classes") {
            assert_eq!(RowId::of(&class, "gym_id").as_ref(), Some(&seed.gym_id));
        }
    }

    #[tokio::test]
    async fn test_owner_profile_requires_email() {
        let store = MemoryStore::new().with_table("profiles", vec![]);
        let err = seed_owner_profile(&store, &OwnerProfile::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(store.calls().is_empty());
    }
}
