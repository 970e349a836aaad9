// Print the final state of the database and the generated files

use anyhow::{Context, Result};
use fitpass_admin::{cmd, init_tracing, AppContext};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let ctx = AppContext::from_env().context("Failed to load configuration")?;
    tracing::debug!(project = %ctx.config.project_ref, "Configuration loaded");

    cmd::verify::run(&ctx).await;

    Ok(())
}
