//! `rowbind delete`: remove one row by primary key.
//!
//! The row is shown and confirmed first; `--yes` skips the question.

use super::context::CliContext;
use super::error::HelpfulError;
use super::input;
use super::output::{object_row, print_table};
use super::report;
use super::update::not_found;
use anyhow::Result;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct DeleteArgs {
    /// Table name (case-insensitive)
    pub table: String,

    /// Primary key of the row to delete
    pub key: String,

    /// Delete without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub fn run(args: DeleteArgs, ctx: &CliContext) -> Result<()> {
    let schema = super::lookup_table(&args.table)?;
    let table = schema.table();
    let connector = ctx.connector();

    let obj = input::fetch_by_key(&connector, &schema, &args.key)
        .map_err(|e| report(e, Some(table)))?
        .ok_or_else(|| not_found(table, &args.key))?;

    if !args.yes {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return Err(HelpfulError::new(format!(
                "Refusing to delete from {} without confirmation",
                table
            ))
            .with_context("stdin is not a terminal")
            .with_suggestion("TRY: Confirm up front with --yes")
            .into());
        }

        print_table(&schema.fields().names(), vec![object_row(&obj)]);
        let prompt = format!("Delete this row from {}? [y/N] ", table);
        if !confirm(&prompt, stdin.lock(), io::stdout())? {
            println!("Aborted");
            return Ok(());
        }
    }

    let affected = obj.delete(&connector).map_err(|e| report(e, Some(table)))?;
    info!(table, key = %args.key, affected, "Deleted row");
    println!("Deleted {} row from {}", affected, table);
    Ok(())
}

/// Ask `prompt` and read one answer line. Only `y`/`yes` agree.
fn confirm(prompt: &str, mut input: impl BufRead, mut out: impl Write) -> io::Result<bool> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
