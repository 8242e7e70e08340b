//! `rowbind insert`: create one row from `column=value` arguments.

use super::context::CliContext;
use super::error::HelpfulError;
use super::input::{self, Assignment};
use super::report;
use anyhow::Result;
use rowbind_db::SchemaObject;
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct InsertArgs {
    /// Table name (case-insensitive)
    pub table: String,

    /// Column values; columns not given keep their defaults
    #[arg(value_name = "COLUMN=VALUE", value_parser = input::parse_assignment)]
    pub values: Vec<Assignment>,

    /// Set a column to NULL; may be repeated
    #[arg(long = "null", value_name = "COLUMN")]
    pub nulls: Vec<String>,
}

pub fn run(args: InsertArgs, ctx: &CliContext) -> Result<()> {
    let schema = super::lookup_table(&args.table)?;
    let table = schema.table();

    let mut obj = SchemaObject::new(&schema);
    input::apply(&mut obj, &args.values, &args.nulls).map_err(|e| report(e, Some(table)))?;
    if let Some(invalid) = HelpfulError::invalid_fields(&obj) {
        return Err(invalid.into());
    }

    let affected = obj
        .insert(&ctx.connector())
        .map_err(|e| report(e, Some(table)))?;
    info!(table, affected, "Inserted row");
    println!("Inserted {} row into {}", affected, table);
    Ok(())
}
