//! Schema Engine: alias, type, and default resolution.
//!
//! `resolve` is the single place where a raw value is checked against a
//! `FieldSpec`. It returns an explicit `FallbackReason` instead of failing, and
//! the callers here substitute the field default on that branch. Nothing in
//! this module returns an error to its caller.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace};

use crate::normalize::table::{is_blank, stringify_cell, Row};
use crate::schema::{FieldSpec, FieldType, SectionSchema};

/// A normalized entity: exactly one key per schema field, in schema order.
pub type Entity = Map<String, Value>;

/// Why a raw value could not be used for a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    #[error("no value under the field name or any alias")]
    Missing,

    #[error("value is blank")]
    Blank,

    #[error("could not parse {found:?} as {expected}")]
    Unparseable {
        expected: &'static str,
        found: String,
    },

    #[error("expected {expected}, found {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },
}

/// Finds the raw value for a field: canonical name first, then aliases in
/// declared order. Explicit `null`s count as absent.
pub fn lookup<'a>(raw: &'a Map<String, Value>, spec: &FieldSpec) -> Option<&'a Value> {
    spec.lookup_names()
        .filter_map(|name| raw.get(name))
        .find(|v| !v.is_null())
}

/// Checks `value` against the field's declared type, applying the narrow
/// coercion set when the shape differs.
pub fn resolve(spec: &FieldSpec, value: Option<&Value>) -> Result<Value, FallbackReason> {
    let value = match value {
        None | Some(Value::Null) => return Err(FallbackReason::Missing),
        Some(v) => v,
    };

    let resolved = match spec.field_type {
        FieldType::String => coerce_string(value)?,
        FieldType::Integer => coerce_integer(value)?,
        FieldType::List => coerce_list(value)?,
        FieldType::Map => coerce_map(value),
    };

    Ok(truncate_to_max_length(spec, resolved))
}

/// `resolve`, with the field default substituted on every fallback.
pub fn resolve_or_default(spec: &FieldSpec, value: Option<&Value>) -> Value {
    match resolve(spec, value) {
        Ok(v) => v,
        Err(FallbackReason::Missing) => {
            trace!(field = spec.name, "field missing, using default");
            spec.produce_default()
        }
        Err(reason) => {
            debug!(field = spec.name, %reason, "field fell back to default");
            spec.produce_default()
        }
    }
}

/// Builds an entity from a raw map: every schema field, in order, resolved by
/// name/alias with default substitution.
pub fn extract_fields(raw: &Map<String, Value>, schema: &SectionSchema) -> Entity {
    schema
        .fields()
        .iter()
        .map(|spec| {
            let value = resolve_or_default(spec, lookup(raw, spec));
            (spec.name.to_string(), value)
        })
        .collect()
}

/// Applies `extract_fields` to each map in `raw_list` and drops entities whose
/// every value renders blank. Non-map items are skipped.
pub fn extract_list_fields(raw_list: &[Value], schema: &SectionSchema) -> Vec<Entity> {
    raw_list
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item.as_object() {
            Some(map) => Some(extract_fields(map, schema)),
            None => {
                debug!(
                    section = schema.entity_name,
                    index = i,
                    "skipping non-map list item"
                );
                None
            }
        })
        .filter(|entity| !is_blank_entity(entity))
        .collect()
}

/// True when every value of the entity renders as blank text.
pub fn is_blank_entity(entity: &Entity) -> bool {
    entity.values().all(is_blank)
}

/// Renders entities as rows of strings in the schema's field order.
/// Missing keys and `null`s become empty cells.
pub fn convert_to_table_format(entities: &[Entity], schema: &SectionSchema) -> Vec<Row> {
    entities
        .iter()
        .map(|entity| {
            schema
                .field_names()
                .map(|name| entity.get(name).map(stringify_cell).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Positional inverse of `convert_to_table_format` for a single row.
///
/// Values are zipped against the schema's field order; missing or blank
/// positions take the field default, anything else goes through `resolve`.
pub fn map_form_to_data(form_values: &[Value], schema: &SectionSchema) -> Entity {
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let value = form_values.get(i).filter(|v| !is_blank(v));
            (spec.name.to_string(), resolve_or_default(spec, value))
        })
        .collect()
}

fn coerce_string(value: &Value) -> Result<Value, FallbackReason> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(_) | Value::Bool(_) => Ok(Value::String(stringify_cell(value))),
        Value::Array(items) if items.iter().all(is_scalar) => {
            Ok(Value::String(stringify_cell(value)))
        }
        other => Err(FallbackReason::WrongShape {
            expected: "string",
            found: shape_name(other),
        }),
    }
}

fn coerce_integer(value: &Value) -> Result<Value, FallbackReason> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0) {
                if f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Ok(Value::from(f as i64))
                } else {
                    Err(FallbackReason::Unparseable {
                        expected: "integer",
                        found: n.to_string(),
                    })
                }
            } else {
                Err(FallbackReason::Unparseable {
                    expected: "integer",
                    found: n.to_string(),
                })
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(FallbackReason::Blank);
            }
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FallbackReason::Unparseable {
                    expected: "integer",
                    found: trimmed.to_string(),
                })
        }
        other => Err(FallbackReason::WrongShape {
            expected: "integer",
            found: shape_name(other),
        }),
    }
}

fn coerce_list(value: &Value) -> Result<Value, FallbackReason> {
    match value {
        Value::Array(_) => Ok(value.clone()),
        Value::String(s) if s.trim().is_empty() => Err(FallbackReason::Blank),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            Ok(Value::Array(vec![value.clone()]))
        }
        other => Err(FallbackReason::WrongShape {
            expected: "list",
            found: shape_name(other),
        }),
    }
}

fn coerce_map(value: &Value) -> Value {
    match value {
        Value::Object(_) => value.clone(),
        _ => Value::Object(Map::new()),
    }
}

fn truncate_to_max_length(spec: &FieldSpec, value: Value) -> Value {
    match (spec.max_length, value) {
        (Some(max), Value::String(s)) if s.chars().count() > max => {
            debug!(field = spec.name, max, "truncating over-long value");
            Value::String(s.chars().take(max).collect())
        }
        (_, value) => value,
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
