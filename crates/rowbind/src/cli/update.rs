//! `rowbind update`: change one existing row, addressed by primary key.
//!
//! The primary key itself may be reassigned; the row is located by the
//! value it had when fetched. A key that other tables still reference only
//! moves with `--cascade`, which carries the referencing rows along.

use super::context::CliContext;
use super::error::HelpfulError;
use super::input::{self, Assignment};
use super::report;
use anyhow::Result;
use rowbind_db::{tables, SchemaObject};
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    /// Table name (case-insensitive)
    pub table: String,

    /// Primary key of the row to change
    pub key: String,

    /// New column values
    #[arg(value_name = "COLUMN=VALUE", value_parser = input::parse_assignment)]
    pub values: Vec<Assignment>,

    /// Set a column to NULL; may be repeated
    #[arg(long = "null", value_name = "COLUMN")]
    pub nulls: Vec<String>,

    /// When the primary key changes, move rows that reference it as well
    #[arg(long)]
    pub cascade: bool,
}

pub fn run(args: UpdateArgs, ctx: &CliContext) -> Result<()> {
    let schema = super::lookup_table(&args.table)?;
    let table = schema.table();
    let connector = ctx.connector();

    let mut obj = input::fetch_by_key(&connector, &schema, &args.key)
        .map_err(|e| report(e, Some(table)))?
        .ok_or_else(|| not_found(table, &args.key))?;

    input::apply(&mut obj, &args.values, &args.nulls).map_err(|e| report(e, Some(table)))?;
    if !obj.is_modified() {
        println!("Nothing to update in {}", table);
        return Ok(());
    }
    if let Some(invalid) = HelpfulError::invalid_fields(&obj) {
        return Err(invalid.into());
    }

    let references = tables::references_to(table);
    if args.cascade {
        let outcome = obj
            .update_cascading(&connector, &references)
            .map_err(|e| report(e, Some(table)))?;
        info!(
            table,
            key = %args.key,
            affected = outcome.affected,
            moved = outcome.moved,
            "Updated row"
        );
        println!("Updated {} row in {}", outcome.affected, table);
        if outcome.moved > 0 {
            println!("Moved {} referencing row(s) to the new key", outcome.moved);
        }
        return Ok(());
    }

    if obj.is_key_changed().map_err(|e| report(e, Some(table)))? {
        let dependents = obj
            .dependents(&connector, &references)
            .map_err(|e| report(e, Some(table)))?;
        if !dependents.is_empty() {
            return Err(still_referenced(table, &args.key, &dependents).into());
        }
    }

    let affected = obj.update(&connector).map_err(|e| report(e, Some(table)))?;
    info!(table, key = %args.key, affected, "Updated row");
    println!("Updated {} row in {}", affected, table);
    Ok(())
}

fn still_referenced(table: &str, key: &str, dependents: &[SchemaObject]) -> HelpfulError {
    let mut by_table: Vec<(&str, usize)> = Vec::new();
    for row in dependents {
        match by_table.iter_mut().find(|(t, _)| *t == row.table()) {
            Some((_, n)) => *n += 1,
            None => by_table.push((row.table(), 1)),
        }
    }
    let counts = by_table
        .iter()
        .map(|(t, n)| format!("{} in {}", n, t))
        .collect::<Vec<_>>()
        .join(", ");

    HelpfulError::new(format!(
        "Primary key {} of {} is still referenced by other rows",
        key, table
    ))
    .with_context(format!("Referencing rows: {}", counts))
    .with_suggestion("TRY: Move them with the row by repeating the command with --cascade")
}

pub(super) fn not_found(table: &str, key: &str) -> anyhow::Error {
    HelpfulError::new(format!("No row in {} with primary key {}", table, key))
        .with_suggestion(format!("TRY: Inspect existing rows: rowbind list {}", table))
        .into()
}
