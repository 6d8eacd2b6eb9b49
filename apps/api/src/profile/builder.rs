//! Profile Builder: per-section table rows → canonical record.
//!
//! Each row is checked against its section's derived row threshold, mapped
//! positionally through the schema, and dropped if it extracts to nothing.
//! A bad row is logged and skipped; it never aborts the section.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::normalize::achievements::achievements_to_list;
use crate::normalize::engine::{is_blank_entity, map_form_to_data};
use crate::normalize::table::{extract_rows, Row};
use crate::normalize::Entity;
use crate::profile::entries::normalize_others;
use crate::profile::models::{CanonicalRecord, FlatFormValues, ProfileForm};
use crate::schema::{personal_info_schema, SectionKind};

#[derive(Debug, Error)]
enum RowRejection {
    #[error("row has {found} cells, needs at least {required}")]
    TooShort { found: usize, required: usize },
}

/// Builds a canonical record from form input.
pub fn build_profile(form: &ProfileForm) -> CanonicalRecord {
    let mut record = CanonicalRecord {
        personal_info: map_form_to_data(&form.personal, personal_info_schema()),
        others: normalize_others(&form.others),
        ..Default::default()
    };

    for kind in SectionKind::ALL {
        record.set_section(kind, build_section(kind, form.section(kind)));
    }

    debug!(
        education = record.education.len(),
        experience = record.experience.len(),
        skills = record.skills.len(),
        projects = record.projects.len(),
        certifications = record.certifications.len(),
        others = record.others.len(),
        "built profile"
    );
    record
}

/// Builds a canonical record straight from the flat slot sequence.
pub fn build_from_flat(values: &FlatFormValues) -> CanonicalRecord {
    build_profile(&ProfileForm::from_flat(values))
}

/// Converts one section's table-like value into entities.
pub fn build_section(kind: SectionKind, table_like: &Value) -> Vec<Entity> {
    extract_rows(table_like)
        .iter()
        .enumerate()
        .filter_map(|(index, row)| match build_entry(kind, row) {
            Ok(entry) => entry,
            Err(rejection) => {
                warn!(section = kind.key(), index, %rejection, "skipping row");
                None
            }
        })
        .collect()
}

fn build_entry(kind: SectionKind, row: &Row) -> Result<Option<Entity>, RowRejection> {
    let schema = kind.schema();

    if row.iter().all(|cell| cell.trim().is_empty()) {
        return Ok(None);
    }

    let required = schema.required_row_len();
    if row.len() < required {
        return Err(RowRejection::TooShort {
            found: row.len(),
            required,
        });
    }

    let cells: Vec<Value> = row
        .iter()
        .take(schema.len())
        .map(|cell| Value::String(cell.clone()))
        .collect();
    let mut entity = map_form_to_data(&cells, schema);

    if is_blank_entity(&entity) {
        return Ok(None);
    }

    if kind == SectionKind::Experience {
        achievements_to_list(&mut entity);
    }
    Ok(Some(entity))
}
