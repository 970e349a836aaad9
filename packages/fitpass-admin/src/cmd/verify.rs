//! Final verification report: database contents, generated files, and
//! what remains to be done by hand.

use colored::Colorize;
use table_store::TableStore;

use crate::catalog::CORE_TABLES;
use crate::context::AppContext;
use crate::report::{group_thousands, integration_status, record_lines, Status, KEY_QUERIES};
use crate::scripts::{artifact_size, ARTIFACTS};

#[derive(Debug, Default)]
pub struct VerificationSummary {
    /// Row count per core table; `None` when the table could not be read.
    pub table_counts: Vec<(&'static str, Option<usize>)>,
    pub artifacts_found: Vec<&'static str>,
    pub artifacts_missing: Vec<&'static str>,
}

pub async fn run<S: TableStore>(ctx: &AppContext<S>) -> VerificationSummary {
    ctx.print_banner("CABO FITPASS - FINAL VERIFICATION REPORT");
    ctx.print_info(&format!("Supabase Project: {}", ctx.config.project_ref));
    if let Some(app_url) = &ctx.config.app_url {
        ctx.print_info(&format!("Project URL: {app_url}"));
    }
    ctx.print_info(&format!("Dashboard: {}", ctx.config.dashboard_url()));

    let mut summary = VerificationSummary {
        table_counts: show_database_state(ctx).await,
        ..Default::default()
    };
    show_generated_files(ctx, &mut summary);
    show_sql_queries(ctx);
    show_integration_status(ctx);

    ctx.print_footer("VERIFICATION COMPLETE!");
    let account = match &ctx.config.owner.email {
        Some(email) => format!("Create user account for {email}"),
        None => "Create the owner user account".to_string(),
    };
    ctx.print_next_steps(&[
        "Execute SQL scripts in Supabase dashboard".to_string(),
        "Copy React components to Lovable.io".to_string(),
        "Configure environment variables".to_string(),
        "Deploy and test integration".to_string(),
        account,
    ]);
    summary
}

async fn show_database_state<S: TableStore>(
    ctx: &AppContext<S>,
) -> Vec<(&'static str, Option<usize>)> {
    ctx.print_header("CURRENT DATABASE STATE");

    let mut counts = Vec::with_capacity(CORE_TABLES.len());
    for &table in CORE_TABLES {
        match ctx.store.list_rows(table).await {
            Ok(rows) => {
                println!();
                ctx.print_subheader(&format!("{} - {} records", table.to_uppercase(), rows.len()));
                if rows.is_empty() {
                    println!("  (No records)");
                }
                for (i, row) in rows.iter().enumerate() {
                    println!("Record {}:", i + 1);
                    for line in record_lines(row) {
                        println!("{line}");
                    }
                    println!();
                }
                counts.push((table, Some(rows.len())));
            }
            Err(e) => {
                ctx.print_error(&format!("Error accessing {table}: {e}"));
                counts.push((table, None));
            }
        }
    }
    counts
}

fn show_generated_files<S>(ctx: &AppContext<S>, summary: &mut VerificationSummary) {
    ctx.print_header("GENERATED FILES");

    for artifact in ARTIFACTS {
        match artifact_size(&ctx.config.output_dir, artifact) {
            Some(size) => {
                ctx.print_success(artifact.name);
                println!("   Purpose: {}", artifact.purpose);
                println!("   Size: {} bytes", group_thousands(size));
                println!("   Action: {}", artifact.action);
                println!();
                summary.artifacts_found.push(artifact.name);
            }
            None => {
                ctx.print_error(&format!("{} - Not found", artifact.name));
                summary.artifacts_missing.push(artifact.name);
            }
        }
    }
}

fn show_sql_queries<S>(ctx: &AppContext<S>) {
    ctx.print_header("KEY SQL QUERIES FOR LOVABLE INTEGRATION");

    for (name, sql) in KEY_QUERIES {
        println!();
        ctx.print_subheader(name);
        println!("{sql}");
    }
}

fn show_integration_status<S>(ctx: &AppContext<S>) {
    ctx.print_header("INTEGRATION STATUS");

    for entry in integration_status(&ctx.config) {
        let label = match entry.status {
            Status::Complete => entry.status.label().bright_green(),
            Status::Ready => entry.status.label().green(),
            Status::Pending => entry.status.label().yellow(),
        };
        println!("{label} {}", entry.item);
        println!("    {}", entry.description);
        println!();
    }
}
