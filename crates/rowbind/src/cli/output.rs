//! Table and JSON rendering for command output.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use rowbind_db::{SchemaObject, Value};
use serde_json::{Map, Value as JsonValue};

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    println!("{}", table);
}

/// Cell text for a field value; NULL is shown as an empty cell.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One object as a column-ordered row of cells.
pub fn object_row(obj: &SchemaObject) -> Vec<String> {
    obj.fields()
        .iter()
        .map(|(_, field)| format_cell(field.value()))
        .collect()
}

/// One object as a JSON object keyed by column name.
pub fn object_json(obj: &SchemaObject) -> serde_json::Result<JsonValue> {
    let mut map = Map::new();
    for (name, field) in obj.fields().iter() {
        map.insert(name.to_string(), serde_json::to_value(field.value())?);
    }
    Ok(JsonValue::Object(map))
}
