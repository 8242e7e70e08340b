//! `rowbind list`: fetch rows of one table, optionally filtered and sorted.

use super::context::CliContext;
use super::input::{self, Assignment};
use super::output::{object_json, object_row, print_table};
use super::report;
use anyhow::Result;
use rowbind_db::{Error, SchemaObject, TypedField, Value};
use std::cmp::Ordering;
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Table name (case-insensitive)
    pub table: String,

    /// Only rows where column equals value; repeat for AND
    #[arg(long = "where", value_name = "COLUMN=VALUE", value_parser = input::parse_assignment)]
    pub filters: Vec<Assignment>,

    /// Order rows by this column
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// With --sort, largest first
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ListArgs, ctx: &CliContext) -> Result<()> {
    let schema = super::lookup_table(&args.table)?;
    let table = schema.table();
    let filters = input::filters(&schema, &args.filters).map_err(|e| report(e, Some(table)))?;

    if let Some(column) = args.sort.as_deref() {
        if !schema.fields().contains(column) {
            return Err(report(Error::field_not_found(table, column), Some(table)));
        }
    }

    let connector = ctx.connector();
    let mut objects = SchemaObject::fetch_where(&connector, &schema, &filters)
        .map_err(|e| report(e, Some(table)))?;
    if let Some(column) = args.sort.as_deref() {
        sort_objects(&mut objects, column, args.desc);
    }
    info!(table, filters = filters.len(), rows = objects.len(), "Listed rows");

    if args.json {
        let rows = objects
            .iter()
            .map(object_json)
            .collect::<serde_json::Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if objects.is_empty() {
        println!("No rows in {}", table);
        return Ok(());
    }

    let headers = schema.fields().names();
    print_table(&headers, objects.iter().map(object_row).collect());
    println!(
        "{} row{}",
        objects.len(),
        if objects.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Stable sort by one column's stored value. NULLs come first ascending.
fn sort_objects(objects: &mut [SchemaObject], column: &str, desc: bool) {
    let key = |obj: &SchemaObject| {
        obj.typed_field(column)
            .map(TypedField::storage_value)
            .unwrap_or_default()
    };
    objects.sort_by(|a, b| {
        let order = compare_cells(&key(a), &key(b));
        if desc {
            order.reverse()
        } else {
            order
        }
    });
}

fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Integer(x), Value::Real(y)) => (*x as f64).total_cmp(y),
        (Value::Real(x), Value::Integer(y)) => x.total_cmp(&(*y as f64)),
        (Value::Real(x), Value::Real(y)) => x.total_cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
