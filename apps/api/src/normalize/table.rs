//! Table Data Extractor: turns loosely shaped "table-like" values into rows.
//!
//! Grid widgets hand back either a bare 2-D array or a wrapper object with the
//! rows under `data`. Everything else is treated as an empty table. None of
//! these functions mutate their inputs.

use std::collections::HashSet;

use serde_json::Value;

/// One table row: stringified cells in schema field order.
pub type Row = Vec<String>;

/// Key under which wrapper objects expose their rows.
const WRAPPER_ROWS_KEY: &str = "data";

/// Normalizes a table-like value into an ordered list of rows.
///
/// Never fails: unknown shapes yield an empty list, and entries of a 2-D array
/// that are not themselves arrays are skipped.
pub fn extract_rows(table_like: &Value) -> Vec<Row> {
    match table_like {
        Value::Array(rows) => rows_from(rows),
        Value::Object(wrapper) => wrapper
            .get(WRAPPER_ROWS_KEY)
            .and_then(Value::as_array)
            .map(|rows| rows_from(rows))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn rows_from(rows: &[Value]) -> Vec<Row> {
    rows.iter()
        .filter_map(Value::as_array)
        .map(|cells| cells.iter().map(stringify_cell).collect())
        .collect()
}

/// Returns the existing rows with `new_row` appended.
pub fn add_row(new_row: Row, existing: &Value) -> Vec<Row> {
    let mut rows = extract_rows(existing);
    rows.push(new_row);
    rows
}

/// Drops rows whose index is in `indices`, keeping the rest in order.
pub fn remove_rows(rows: &[Row], indices: &HashSet<usize>) -> Vec<Row> {
    rows.iter()
        .enumerate()
        .filter(|(i, _)| !indices.contains(i))
        .map(|(_, row)| row.clone())
        .collect()
}

pub fn empty_row(cells: usize) -> Row {
    vec![String::new(); cells]
}

/// Renders a JSON value as a single table cell.
///
/// `null` becomes the empty string; lists are joined with `", "` after
/// dropping blank items; empty maps are blank.
pub fn stringify_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(stringify_cell)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) if map.is_empty() => String::new(),
        Value::Object(_) => value.to_string(),
    }
}

/// True when the value renders to nothing but whitespace.
pub fn is_blank(value: &Value) -> bool {
    stringify_cell(value).trim().is_empty()
}
