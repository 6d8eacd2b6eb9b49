//! Field-level metadata: declared type, default, aliases, and limits.

use serde::Serialize;
use serde_json::{Map, Value};

/// The runtime shape a field is expected to hold once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    List,
    Map,
}

impl FieldType {
    /// Returns true if `value` already has this shape.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::List => value.is_array(),
            FieldType::Map => value.is_object(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::List => "list",
            FieldType::Map => "map",
        }
    }
}

/// A default is either a literal value or a factory producing a fresh one.
#[derive(Debug, Clone)]
pub enum FieldDefault {
    Literal(Value),
    Factory(fn() -> Value),
}

impl FieldDefault {
    pub fn produce(&self) -> Value {
        match self {
            FieldDefault::Literal(v) => v.clone(),
            FieldDefault::Factory(f) => f(),
        }
    }

    /// The natural empty value for a type: `""`, `0`, `[]`, `{}`.
    pub fn empty_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::String => FieldDefault::Literal(Value::String(String::new())),
            FieldType::Integer => FieldDefault::Literal(Value::from(0)),
            FieldType::List => FieldDefault::Factory(|| Value::Array(Vec::new())),
            FieldType::Map => FieldDefault::Factory(|| Value::Object(Map::new())),
        }
    }
}

/// Declarative description of one field in a section.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub default: FieldDefault,
    /// Alternate input names, checked in order after `name`.
    pub aliases: &'static [&'static str],
    pub required: bool,
    pub max_length: Option<usize>,
}

impl FieldSpec {
    /// A non-required string field with an empty-string default.
    pub fn text(name: &'static str) -> Self {
        Self::typed(name, FieldType::String)
    }

    pub fn typed(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            default: FieldDefault::empty_for(field_type),
            aliases: &[],
            required: false,
            max_length: None,
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn default_value(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    pub fn produce_default(&self) -> Value {
        self.default.produce()
    }

    /// The canonical name followed by every alias, in lookup order.
    pub fn lookup_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}
