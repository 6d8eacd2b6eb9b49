//! Section-level helpers shared by the builder, loader, and merger.

use serde_json::{Map, Value};
use tracing::debug;

use crate::normalize::achievements::encode_raw_achievements;
use crate::normalize::engine::{extract_list_fields, is_blank_entity, map_form_to_data};
use crate::normalize::table::{stringify_cell, Row};
use crate::normalize::{extract_fields, Entity};
use crate::schema::{others_item_schema, SectionKind};

/// Finds a section in a document: canonical key first, then the section's
/// alternate spellings. `null` counts as absent.
pub fn lookup_section(root: &Map<String, Value>, kind: SectionKind) -> Option<&Value> {
    std::iter::once(kind.key())
        .chain(kind.alternate_keys().iter().copied())
        .filter_map(|key| root.get(key))
        .find(|v| !v.is_null())
}

/// Runs raw section items through the section schema.
///
/// Experience achievements come out as bulleted text: list values are encoded
/// per item before the schema pass, so each entity keeps its own bullets even
/// after blank items are filtered out.
pub fn extract_section_entries(kind: SectionKind, items: &[Value]) -> Vec<Entity> {
    let schema = kind.schema();
    match kind {
        SectionKind::Experience => {
            let prepared: Vec<Value> = items.iter().map(encode_raw_achievements).collect();
            extract_list_fields(&prepared, schema)
        }
        _ => extract_list_fields(items, schema),
    }
}

/// Normalizes an "others" value into `section name → [item, ...]`.
///
/// Items may be maps (matched by name/alias) or positional rows. Blank items
/// are dropped, then sections left with no items are dropped. Anything that is
/// not a map yields an empty result.
pub fn normalize_others(value: &Value) -> Map<String, Value> {
    let Some(sections) = value.as_object() else {
        return Map::new();
    };
    let schema = others_item_schema();

    let mut normalized = Map::new();
    for (name, items) in sections {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let Some(items) = items.as_array() else {
            debug!(section = name, "others section is not a list, dropping");
            continue;
        };
        let entities: Vec<Value> = items
            .iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(extract_fields(map, schema)),
                Value::Array(cells) => Some(map_form_to_data(cells, schema)),
                _ => None,
            })
            .filter(|entity| !is_blank_entity(entity))
            .map(Value::Object)
            .collect();
        if !entities.is_empty() {
            normalized.insert(name.to_string(), Value::Array(entities));
        }
    }
    normalized
}

/// Flattens normalized others into display rows: the section name followed by
/// the item's fields in schema order.
pub fn others_display_table(others: &Map<String, Value>) -> Vec<Row> {
    let schema = others_item_schema();
    others
        .iter()
        .flat_map(|(section, items)| {
            items
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_object)
                .map(move |item| {
                    std::iter::once(section.clone())
                        .chain(
                            schema
                                .field_names()
                                .map(|name| item.get(name).map(stringify_cell).unwrap_or_default()),
                        )
                        .collect::<Row>()
                })
        })
        .collect()
}
