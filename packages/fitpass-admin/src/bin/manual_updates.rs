// Clean dangling bookings, add sample gym data, and write SQL scripts for the SQL editor

use anyhow::{Context, Result};
use fitpass_admin::{cmd, init_tracing, AppContext};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let ctx = AppContext::from_env().context("Failed to load configuration")?;
    tracing::debug!(project = %ctx.config.project_ref, "Configuration loaded");

    cmd::manual::run(&ctx).await;

    Ok(())
}
