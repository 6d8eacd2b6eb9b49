//! Resume Loader: external JSON document → flat form values.
//!
//! External producers disagree on field names and nesting; everything goes
//! through the section schemas so the edit surface always receives the same
//! slot layout.

use serde_json::{Map, Value};
use tracing::debug;

use crate::normalize::engine::{convert_to_table_format, extract_fields};
use crate::normalize::layout::FlatFormLayout;
use crate::normalize::table::empty_row;
use crate::normalize::Entity;
use crate::profile::document::read_document;
use crate::profile::entries::{
    extract_section_entries, lookup_section, normalize_others, others_display_table,
};
use crate::profile::error::ProfileError;
use crate::profile::models::FlatFormValues;
use crate::schema::{personal_info_schema, SectionKind};

const PERSONAL_INFO_KEY: &str = "personal_info";
const OTHERS_KEY: &str = "others";

/// Produces the flat slot sequence for an external document.
///
/// Personal info is read from a nested `personal_info` map when present,
/// otherwise from the top level. Missing sections become empty tables.
pub fn load_from_external(document: &Value) -> FlatFormValues {
    let layout = FlatFormLayout::current();
    let empty = Map::new();
    let root = document.as_object().unwrap_or(&empty);

    let mut slots: Vec<Value> = Vec::with_capacity(layout.total_len());

    let personal_source = root
        .get(PERSONAL_INFO_KEY)
        .and_then(Value::as_object)
        .unwrap_or(root);
    let personal = extract_fields(personal_source, personal_info_schema());
    slots.extend(personal.into_iter().map(|(_, value)| value));
    slots.push(Value::String(String::new()));

    for kind in SectionKind::ALL {
        let schema = kind.schema();
        let entities = load_section(root, kind);
        debug!(section = kind.key(), rows = entities.len(), "loaded section");

        slots.extend(empty_row(schema.len()).into_iter().map(Value::String));
        slots.push(Value::from(convert_to_table_format(&entities, schema)));
    }

    let others = normalize_others(root.get(OTHERS_KEY).unwrap_or(&Value::Null));
    let others_table = others_display_table(&others);
    slots.push(Value::Object(others));
    slots.push(Value::from(others_table));
    slots.push(Value::Null);

    FlatFormValues::from_layout_slots(slots)
}

/// Decodes uploaded bytes and loads them; fails only if the bytes cannot be
/// read as JSON under any supported encoding.
pub fn load_from_bytes(bytes: &[u8]) -> Result<FlatFormValues, ProfileError> {
    let document = read_document(bytes)?;
    Ok(load_from_external(&document))
}

fn load_section(root: &Map<String, Value>, kind: SectionKind) -> Vec<Entity> {
    match lookup_section(root, kind).and_then(Value::as_array) {
        Some(items) => extract_section_entries(kind, items),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builder::build_from_flat;
    use crate::profile::models::CanonicalRecord;
    use serde_json::json;

    fn ada() -> Value {
        json!({
            "full_name": "Ada Lovelace",
            "experience": [{
                "company": "Acme",
                "position": "Engineer",
                "achievements": ["Shipped v1", "Fixed bug"]
            }]
        })
    }

    #[test]
    fn test_output_length_matches_layout() {
        let values = load_from_external(&json!({}));
        assert_eq!(values.len(), FlatFormLayout::current().total_len());
        let values = load_from_external(&json!("not even a map"));
        assert_eq!(values.len(), FlatFormLayout::current().total_len());
    }

    #[test]
    fn test_experience_achievements_become_bulleted_cell() {
        let values = load_from_external(&ada());
        let rows = values.section_rows(SectionKind::Experience);
        assert_eq!(rows.len(), 1);

        let schema = SectionKind::Experience.schema();
        let cell = &rows[0][schema.position("achievements").unwrap()];
        assert_eq!(cell, "- Shipped v1\n- Fixed bug");
    }

    #[test]
    fn test_achievements_round_trip_through_builder() {
        let record = build_from_flat(&load_from_external(&ada()));
        assert_eq!(record.personal_info["full_name"], json!("Ada Lovelace"));
        assert_eq!(record.experience.len(), 1);
        assert_eq!(
            record.experience[0]["achievements"],
            json!(["Shipped v1", "Fixed bug"])
        );
    }

    #[test]
    fn test_personal_info_nested_preferred_over_top_level() {
        let doc = json!({
            "full_name": "Top Level",
            "personal_info": {"name": "Nested", "mail": "n@example.com"}
        });
        let values = load_from_external(&doc);
        assert_eq!(values.personal()[0], json!("Nested"));
        assert_eq!(values.personal()[1], json!("n@example.com"));
    }

    #[test]
    fn test_aliases_resolved_into_schema_columns() {
        let doc = json!({
            "education": [{"school": "MIT", "major": "Math", "graduation_date": "2020"}],
            "skills": [{"name": "Languages", "items": ["Rust", "Go"]}]
        });
        let values = load_from_external(&doc);

        let edu = values.section_rows(SectionKind::Education);
        let schema = SectionKind::Education.schema();
        assert_eq!(edu[0][schema.position("institution").unwrap()], "MIT");
        assert_eq!(edu[0][schema.position("field_of_study").unwrap()], "Math");
        assert_eq!(edu[0][schema.position("end_date").unwrap()], "2020");

        let skills = values.section_rows(SectionKind::Skills);
        assert_eq!(skills[0], vec!["Languages", "Rust, Go", ""]);
    }

    #[test]
    fn test_missing_sections_and_raw_slots_are_blank() {
        let values = load_from_external(&json!({"full_name": "X"}));
        let layout = values.layout();
        for kind in SectionKind::ALL {
            let slots = layout.section_slots(kind);
            assert_eq!(values.section_table(kind), &json!([]));
            for i in slots.raw.clone() {
                assert_eq!(values.as_slice()[i], json!(""));
            }
        }
        assert_eq!(values.others(), &json!({}));
        assert_eq!(values.as_slice()[layout.others_selector_index()], Value::Null);
    }

    #[test]
    fn test_others_map_and_display_table() {
        let doc = json!({"others": {"Awards": [{"title": "Turing", "organization": "ACM"}]}});
        let values = load_from_external(&doc);
        assert_eq!(values.others()["Awards"][0]["organization"], json!("ACM"));
        assert_eq!(values.others_table()[0][0], json!("Awards"));
        assert_eq!(values.others_table()[0][1], json!("Turing"));
    }

    #[test]
    fn test_canonical_record_reloads_to_same_record() {
        let doc = json!({
            "personal_info": {"full_name": "Grace Hopper", "summary": "Compiler pioneer"},
            "education": [{"institution": "Yale", "degree": "PhD"}],
            "experience": [{"company": "US Navy", "position": "Rear Admiral",
                            "achievements": ["COBOL", "First compiler"]}],
            "projects": [{"name": "A-0", "url": "https://example.org"}],
            "certifications": [{"name": "Cert", "issuer": "Org"}],
            "others": {"Awards": [{"title": "Medal of Freedom"}]}
        });
        let first = build_from_flat(&load_from_external(&doc));
        let serialized = serde_json::to_value(&first).unwrap();
        let second: CanonicalRecord = build_from_flat(&load_from_external(&serialized));
        assert_eq!(first, second);
        assert_eq!(second.summary(), "Compiler pioneer");
        assert_eq!(second.experience[0]["achievements"], json!(["COBOL", "First compiler"]));
    }

    #[test]
    fn test_load_from_bytes_propagates_unreadable() {
        assert!(matches!(
            load_from_bytes(b"\x00\x01 definitely not json"),
            Err(ProfileError::UnreadableDocument { .. })
        ));
        let values = load_from_bytes(ada().to_string().as_bytes()).unwrap();
        assert_eq!(values.personal()[0], json!("Ada Lovelace"));
    }
}
