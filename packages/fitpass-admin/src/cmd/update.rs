//! Full database update: clean, create the owner, add tables and test data.

use table_store::{RowId, TableStore};

use crate::catalog::{create_planned_tables, SAMPLED_TABLES, VERIFY_TABLES};
use crate::cmd::clean_bookings;
use crate::context::AppContext;
use crate::report::pretty_row;
use crate::seed::{seed_membership_data, seed_owner_profile, MembershipSeed, SeedStep};
use crate::sweep::SweepReport;

/// What the update did, step by step.
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    pub sweep: Option<SweepReport>,
    /// Unset means the run stopped after the profile step.
    pub profile_id: Option<RowId>,
    pub created_tables: Vec<&'static str>,
    pub membership: Option<MembershipSeed>,
    pub table_counts: Vec<(&'static str, Option<usize>)>,
}

pub async fn run<S: TableStore>(ctx: &AppContext<S>) -> UpdateOutcome {
    ctx.print_banner("Starting Cabo FitPass Database Update");
    let mut outcome = UpdateOutcome::default();

    // Step 1: clean invalid data
    outcome.sweep = clean_bookings(ctx, false).await;
    println!();

    // Step 2: owner profile
    let Some(profile_id) = create_owner_profile(ctx).await else {
        ctx.print_error("Failed to create user, stopping");
        return outcome;
    };
    outcome.profile_id = Some(profile_id.clone());
    println!();

    // Step 3: planned tables
    ctx.print_step("Creating missing tables...");
    for creation in create_planned_tables(&ctx.store).await {
        match creation.outcome {
            Ok(()) => {
                ctx.print_success(&format!("Created table: {}", creation.table));
                outcome.created_tables.push(creation.table);
            }
            Err(e) => ctx.print_error(&format!("Error creating {}: {e}", creation.table)),
        }
    }
    println!();

    // Step 4: test data, only if the tables it needs could be created
    if !outcome.created_tables.is_empty() {
        outcome.membership = add_test_data(ctx, &profile_id).await;
        println!();
    }

    // Step 5: verify
    outcome.table_counts = verify_data(ctx).await;

    ctx.print_footer("Database update completed!");
    ctx.print_info(&format!("Project URL: {}", ctx.config.supabase_url));
    ctx.print_info(&format!("Dashboard: {}", ctx.config.dashboard_url()));
    outcome
}

async fn create_owner_profile<S: TableStore>(ctx: &AppContext<S>) -> Option<RowId> {
    ctx.print_step("Creating user and profile...");

    match seed_owner_profile(&ctx.store, &ctx.config.owner).await {
        Ok(profile) => {
            let id = RowId::of_row(&profile)?;
            let email = profile
                .get("email")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            ctx.print_success(&format!("Created profile for {email}"));
            ctx.print_detail(&format!("User ID: {id}"));
            Some(id)
        }
        Err(e) => {
            ctx.print_error(&format!("Error creating user/profile: {e}"));
            None
        }
    }
}

async fn add_test_data<S: TableStore>(
    ctx: &AppContext<S>,
    user_id: &RowId,
) -> Option<MembershipSeed> {
    ctx.print_step("Adding test data...");

    let result = seed_membership_data(&ctx.store, user_id, |step| match step {
        SeedStep::Plans(n) => ctx.print_success(&format!("Added {n} subscription plans")),
        SeedStep::Subscription => ctx.print_success("Added test subscription"),
        SeedStep::Payment => ctx.print_success("Added test payment"),
        SeedStep::Workout => ctx.print_success("Added test workout"),
        SeedStep::Booking => ctx.print_success("Added valid booking"),
    })
    .await;

    match result {
        Ok(seed) => Some(seed),
        Err(e) => {
            ctx.print_error(&format!("Error adding test data: {e}"));
            None
        }
    }
}

async fn verify_data<S: TableStore>(ctx: &AppContext<S>) -> Vec<(&'static str, Option<usize>)> {
    ctx.print_step("Verifying data...");

    let mut counts = Vec::with_capacity(VERIFY_TABLES.len());
    for &table in VERIFY_TABLES {
        match ctx.store.list_rows(table).await {
            Ok(rows) => {
                ctx.print_success(&format!("{table}: {} records", rows.len()));
                if SAMPLED_TABLES.contains(&table) {
                    if let Some(first) = rows.first() {
                        ctx.print_detail(&format!("Sample: {}", pretty_row(first)));
                    }
                }
                counts.push((table, Some(rows.len())));
            }
            Err(e) => {
                ctx.print_error(&format!("Error checking {table}: {e}"));
                counts.push((table, None));
            }
        }
    }
    counts
}
