//! Updates that work within the existing schema, plus SQL scripts for the
//! parts that need the SQL editor.

use std::path::PathBuf;
use table_store::TableStore;

use crate::catalog::{CORE_TABLES, PLANNED_TABLES};
use crate::cmd::clean_bookings;
use crate::context::AppContext;
use crate::report::{column_names, pretty, pretty_row};
use crate::scripts::write_sql_scripts;
use crate::seed::{seed_gym_with_classes, GymSeed};
use crate::sweep::SweepReport;

/// Records shown per table in the state overview.
const PREVIEW_ROWS: usize = 2;

#[derive(Debug, Default)]
pub struct ManualOutcome {
    pub sweep: Option<SweepReport>,
    pub gym: Option<GymSeed>,
    pub scripts_written: Vec<PathBuf>,
}

pub async fn run<S: TableStore>(ctx: &AppContext<S>) -> ManualOutcome {
    ctx.print_banner("Cabo FitPass Database Analysis & Updates");
    let mut outcome = ManualOutcome::default();

    analyze_current_state(ctx).await;
    outcome.sweep = clean_bookings(ctx, true).await;
    println!();
    document_planned_tables(ctx);
    println!();
    outcome.gym = add_more_test_data(ctx).await;
    println!();
    outcome.scripts_written = generate_sql_scripts(ctx);

    ctx.print_footer("Analysis and updates completed!");
    ctx.print_next_steps(&[
        "Execute the generated SQL scripts in Supabase SQL Editor".to_string(),
        "Set up proper RLS policies for new tables".to_string(),
        "Configure authentication in Lovable.io".to_string(),
        "Test the integration".to_string(),
    ]);
    outcome
}

async fn analyze_current_state<S: TableStore>(ctx: &AppContext<S>) {
    ctx.print_step("Analyzing current database state...");

    for &table in CORE_TABLES {
        match ctx.store.list_rows(table).await {
            Ok(rows) => {
                println!("{table}: {} records", rows.len());
                if let Some(first) = rows.first() {
                    println!("   Structure: [{}]", column_names(first).join(", "));
                    for (i, row) in rows.iter().take(PREVIEW_ROWS).enumerate() {
                        println!("   Record {}: {}", i + 1, pretty_row(row));
                    }
                }
            }
            Err(e) => ctx.print_error(&format!("Error accessing {table}: {e}")),
        }
        println!();
    }
}

fn document_planned_tables<S>(ctx: &AppContext<S>) {
    ctx.print_step("Missing tables that need to be created in Supabase dashboard:");

    for table in PLANNED_TABLES {
        println!();
        println!("{}", table.name.to_uppercase());
        println!("   Description: {}", table.description);
        println!("   Columns: {}", table.columns.join(", "));
        println!("   Sample Data: {}", pretty(&table.sample_data()));
    }
}

async fn add_more_test_data<S: TableStore>(ctx: &AppContext<S>) -> Option<GymSeed> {
    ctx.print_step("Adding more test data to existing tables...");

    let seed = match seed_gym_with_classes(&ctx.store).await {
        Ok(seed) => seed,
        Err(e) => {
            ctx.print_error(&format!("Error adding test data: {e}"));
            return None;
        }
    };
    ctx.print_success(&format!("Added new gym: {}", seed.gym_name));
    ctx.print_success(&format!("Added {} new classes", seed.class_ids.len()));

    println!();
    println!("Updated database state:");
    for table in ["gyms", "classes"] {
        match ctx.store.list_rows(table).await {
            Ok(rows) => println!("   {table}: {} records", rows.len()),
            Err(e) => ctx.print_error(&format!("Error accessing {table}: {e}")),
        }
    }
    Some(seed)
}

fn generate_sql_scripts<S>(ctx: &AppContext<S>) -> Vec<PathBuf> {
    let dir = &ctx.config.output_dir;
    ctx.print_step(&format!(
        "Generating SQL scripts for manual execution in {}...",
        dir.display()
    ));

    let mut written = Vec::new();
    for (name, result) in write_sql_scripts(dir) {
        match result {
            Ok(path) => {
                ctx.print_success(&format!("Created {name}"));
                written.push(path);
            }
            Err(e) => ctx.print_error(&format!("{e:#}")),
        }
    }
    written
}
