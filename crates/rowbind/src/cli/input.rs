//! `column=value` arguments and how they land on schema objects.

use rowbind_db::{Result, SchemaDef, SchemaObject, Value};
use std::sync::Arc;

/// One `column=value` pair as typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: String,
    pub raw: String,
}

/// clap value parser for `column=value`.
///
/// Splits at the first `=`, so values may themselves contain `=`.
pub fn parse_assignment(arg: &str) -> std::result::Result<Assignment, String> {
    let (column, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected column=value, got '{}'", arg))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{}'", arg));
    }
    Ok(Assignment {
        column: column.to_string(),
        raw: raw.to_string(),
    })
}

/// Convert operator text for `column` using that column's kind.
pub fn parse_for_column(schema: &SchemaDef, column: &str, raw: &str) -> Result<Value> {
    let field = schema
        .fields()
        .get(column)
        .ok_or_else(|| rowbind_db::Error::field_not_found(schema.table(), column))?;
    Ok(field.kind().parse_input(raw))
}

/// Turn `--where` assignments into typed filters.
pub fn filters<'a>(
    schema: &SchemaDef,
    assignments: &'a [Assignment],
) -> Result<Vec<(&'a str, Value)>> {
    assignments
        .iter()
        .map(|a| Ok((a.column.as_str(), parse_for_column(schema, &a.column, &a.raw)?)))
        .collect()
}

/// Apply assignments, then explicit NULLs, to `obj`'s current values.
pub fn apply(obj: &mut SchemaObject, assignments: &[Assignment], nulls: &[String]) -> Result<()> {
    let schema: Arc<SchemaDef> = Arc::clone(obj.schema());
    for a in assignments {
        let value = parse_for_column(&schema, &a.column, &a.raw)?;
        obj.set_field(&a.column, value)?;
    }
    for column in nulls {
        obj.set_field(column, Value::Null)?;
    }
    Ok(())
}

/// Fetch the single row of `schema` whose primary key equals `raw_key`.
pub fn fetch_by_key<C: rowbind_db::Connector>(
    connector: &C,
    schema: &Arc<SchemaDef>,
    raw_key: &str,
) -> Result<Option<SchemaObject>> {
    let pk = schema.primary_key()?;
    let key = parse_for_column(schema, pk, raw_key)?;
    let mut rows = SchemaObject::fetch_where(connector, schema, &[(pk, key)])?;
    Ok(if rows.is_empty() {
        None
    } else {
        Some(rows.swap_remove(0))
    })
}
