//! `rowbind tables`: describe the known table definitions.

use super::output::print_table;
use anyhow::Result;
use rowbind_db::{tables, TypedField};

#[derive(Debug, clap::Args)]
pub struct TablesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn key_role(field: &TypedField) -> &'static str {
    if field.is_primary_key() {
        "PK"
    } else if field.is_foreign_key() {
        "FK"
    } else {
        ""
    }
}

pub fn run(args: TablesArgs) -> Result<()> {
    let schemas = tables::all();

    if args.json {
        let out: Vec<_> = schemas
            .iter()
            .map(|schema| {
                let columns: Vec<_> = schema
                    .fields()
                    .iter()
                    .map(|(name, field)| {
                        serde_json::json!({
                            "name": name,
                            "type": field.descriptor(),
                            "nullable": field.is_nullable(),
                            "key": key_role(field),
                        })
                    })
                    .collect();
                serde_json::json!({ "table": schema.table(), "columns": columns })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (i, schema) in schemas.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", schema.table());
        let rows = schema
            .fields()
            .iter()
            .map(|(name, field)| {
                vec![
                    name.to_string(),
                    field.descriptor(),
                    if field.is_nullable() { "yes" } else { "no" }.to_string(),
                    key_role(field).to_string(),
                ]
            })
            .collect();
        print_table(&["Column", "Type", "Nullable", "Key"], rows);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_role() {
        assert_eq!(key_role(&TypedField::int32().primary_key()), "PK");
        assert_eq!(key_role(&TypedField::int32().foreign_key()), "FK");
        assert_eq!(key_role(&TypedField::varchar(50)), "");
    }
}
