//! `rowbind check`: open and close one connection to the database.

use super::context::CliContext;
use anyhow::Result;
use tracing::info;

pub fn run(ctx: &CliContext) -> Result<()> {
    let connector = ctx.connector();
    rowbind_db::ping(&connector).map_err(|e| super::report(e, None))?;

    info!(path = %connector.path().display(), "Connection check succeeded");
    println!("Connection OK: {}", connector.path().display());
    Ok(())
}
