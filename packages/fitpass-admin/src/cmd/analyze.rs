//! Schema discovery: which tables exist and what they hold.

use table_store::TableStore;

use crate::context::AppContext;
use crate::probe::{list_public_tables, probe_tables, COMMON_TABLES, PLATFORM_TABLES, SAMPLE_SIZE};
use crate::report::pretty_row;

/// What the analysis found.
#[derive(Debug, Default)]
pub struct SchemaAnalysis {
    /// Tables listed by the database itself, when it could be asked.
    pub listed: Option<Vec<String>>,
    /// Common tables that answered a probe (fallback path only).
    pub probed: Vec<&'static str>,
    /// Platform tables that answered a probe.
    pub platform: Vec<&'static str>,
}

pub async fn run<S: TableStore>(ctx: &AppContext<S>) -> SchemaAnalysis {
    ctx.print_banner("Supabase Database Analysis");
    ctx.print_info(&format!(
        "Connecting to Supabase project: {}",
        ctx.config.project_ref
    ));
    ctx.print_info(&format!("URL: {}", ctx.config.supabase_url));
    println!();

    let mut analysis = analyze_database(ctx).await;
    analysis.platform = check_platform_tables(ctx).await;

    ctx.print_footer("Analysis complete!");
    analysis
}

async fn analyze_database<S: TableStore>(ctx: &AppContext<S>) -> SchemaAnalysis {
    let mut analysis = SchemaAnalysis::default();

    match list_public_tables(&ctx.store).await {
        Ok(tables) => {
            if tables.is_empty() {
                ctx.print_warning("No tables found or unable to access information_schema");
            } else {
                println!("Tables found:");
                for table in &tables {
                    println!("  - {table}");
                }
            }
            analysis.listed = Some(tables);
        }
        Err(e) => {
            ctx.print_error(&format!("Error accessing database schema: {e}"));
            ctx.print_info("Trying alternative approach...");
            println!();
            println!("Checking for common table names:");

            for table in probe_tables(&ctx.store, COMMON_TABLES, SAMPLE_SIZE).await {
                ctx.print_success(&format!("Found table: {}", table.name));
                if !table.rows.is_empty() {
                    println!("  Sample data ({} rows):", table.rows.len());
                    for (i, row) in table.rows.iter().enumerate() {
                        println!("    Row {}: {}", i + 1, pretty_row(row));
                    }
                }
                println!();
                analysis.probed.push(table.name);
            }
        }
    }

    analysis
}

async fn check_platform_tables<S: TableStore>(ctx: &AppContext<S>) -> Vec<&'static str> {
    ctx.print_header("Checking for Lovable.io integration...");

    let found = probe_tables(&ctx.store, PLATFORM_TABLES, 1).await;
    for table in &found {
        ctx.print_success(&format!("Found Lovable table: {}", table.name));
        let rows: Vec<String> = table.rows.iter().map(pretty_row).collect();
        println!("  Data: [{}]", rows.join(", "));
    }

    println!();
    println!("Note: Edge functions and RPC endpoints cannot be directly listed via the client.");
    println!("You would need to check the Supabase dashboard for:");
    println!("  - Edge Functions");
    println!("  - Database Functions (RPC)");
    println!("  - Row Level Security policies");
    println!("  - API configuration");

    found.into_iter().map(|t| t.name).collect()
}
