use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::layout::FlatFormLayout;
use crate::normalize::table::{extract_rows, Row};
use crate::normalize::Entity;
use crate::profile::error::ProfileError;
use crate::schema::{SectionKind, SUMMARY_FIELD};

/// The canonical nested record used for storage, rendering, and revision.
///
/// Every transformation builds a fresh record; nothing patches one in place
/// on behalf of another caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(default)]
    pub personal_info: Entity,
    #[serde(default)]
    pub education: Vec<Entity>,
    #[serde(default)]
    pub experience: Vec<Entity>,
    #[serde(default)]
    pub skills: Vec<Entity>,
    #[serde(default)]
    pub projects: Vec<Entity>,
    #[serde(default)]
    pub certifications: Vec<Entity>,
    /// Section name → list of others items (title/organization/date/...).
    #[serde(default)]
    pub others: Map<String, Value>,
}

impl CanonicalRecord {
    pub fn section(&self, kind: SectionKind) -> &[Entity] {
        match kind {
            SectionKind::Education => &self.education,
            SectionKind::Experience => &self.experience,
            SectionKind::Skills => &self.skills,
            SectionKind::Projects => &self.projects,
            SectionKind::Certifications => &self.certifications,
        }
    }

    pub fn set_section(&mut self, kind: SectionKind, entities: Vec<Entity>) {
        let slot = match kind {
            SectionKind::Education => &mut self.education,
            SectionKind::Experience => &mut self.experience,
            SectionKind::Skills => &mut self.skills,
            SectionKind::Projects => &mut self.projects,
            SectionKind::Certifications => &mut self.certifications,
        };
        *slot = entities;
    }

    pub fn summary(&self) -> &str {
        self.personal_info
            .get(SUMMARY_FIELD)
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// Per-section input for `build_profile`, as a form/grid UI submits it.
///
/// Section values are table-like (2-D array or `{ "data": [...] }` wrapper).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    /// Personal fields, positional in schema order.
    #[serde(default)]
    pub personal: Vec<Value>,
    #[serde(default)]
    pub education: Value,
    #[serde(default)]
    pub experience: Value,
    #[serde(default)]
    pub skills: Value,
    #[serde(default)]
    pub projects: Value,
    #[serde(default)]
    pub certifications: Value,
    #[serde(default)]
    pub others: Value,
}

impl ProfileForm {
    pub fn section(&self, kind: SectionKind) -> &Value {
        match kind {
            SectionKind::Education => &self.education,
            SectionKind::Experience => &self.experience,
            SectionKind::Skills => &self.skills,
            SectionKind::Projects => &self.projects,
            SectionKind::Certifications => &self.certifications,
        }
    }

    fn section_mut(&mut self, kind: SectionKind) -> &mut Value {
        match kind {
            SectionKind::Education => &mut self.education,
            SectionKind::Experience => &mut self.experience,
            SectionKind::Skills => &mut self.skills,
            SectionKind::Projects => &mut self.projects,
            SectionKind::Certifications => &mut self.certifications,
        }
    }

    /// Picks the personal, table, and others slots out of a flat sequence.
    pub fn from_flat(values: &FlatFormValues) -> Self {
        let layout = values.layout();
        let slots = values.as_slice();
        let mut form = ProfileForm {
            personal: slots[layout.personal_range()].to_vec(),
            others: slots[layout.others_data_index()].clone(),
            ..Default::default()
        };
        for kind in SectionKind::ALL {
            *form.section_mut(kind) = slots[layout.section_slots(kind).table].clone();
        }
        form
    }
}

/// The flat, positional slot sequence an edit surface renders.
///
/// Length always equals `FlatFormLayout::current().total_len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatFormValues(Vec<Value>);

impl FlatFormValues {
    /// Wraps a slot vector after checking its length against the layout.
    pub fn from_slots(slots: Vec<Value>) -> Result<Self, ProfileError> {
        let expected = FlatFormLayout::current().total_len();
        if slots.len() != expected {
            return Err(ProfileError::FlatLength {
                expected,
                found: slots.len(),
            });
        }
        Ok(Self(slots))
    }

    /// Wraps slots assembled by walking `FlatFormLayout` itself.
    pub(crate) fn from_layout_slots(slots: Vec<Value>) -> Self {
        debug_assert_eq!(slots.len(), FlatFormLayout::current().total_len());
        Self(slots)
    }

    pub fn layout(&self) -> &'static FlatFormLayout {
        FlatFormLayout::current()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn personal(&self) -> &[Value] {
        &self.0[self.layout().personal_range()]
    }

    pub fn section_table(&self, kind: SectionKind) -> &Value {
        &self.0[self.layout().section_slots(kind).table]
    }

    pub fn section_rows(&self, kind: SectionKind) -> Vec<Row> {
        extract_rows(self.section_table(kind))
    }

    pub fn others(&self) -> &Value {
        &self.0[self.layout().others_data_index()]
    }

    pub fn others_table(&self) -> &Value {
        &self.0[self.layout().others_table_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_slots_rejects_wrong_length() {
        let err = FlatFormValues::from_slots(vec![json!("")]).unwrap_err();
        assert!(matches!(err, ProfileError::FlatLength { found: 1, .. }));
    }

    #[test]
    fn test_record_deserializes_with_missing_sections() {
        let record: CanonicalRecord =
            serde_json::from_value(json!({"personal_info": {"summary": "hi"}})).unwrap();
        assert_eq!(record.summary(), "hi");
        assert!(record.experience.is_empty());
        assert!(record.others.is_empty());
    }

    #[test]
    fn test_set_section_replaces_only_that_section() {
        let mut record = CanonicalRecord::default();
        let mut entity = Entity::new();
        entity.insert("name".into(), json!("AWS SA"));
        record.set_section(SectionKind::Certifications, vec![entity]);
        assert_eq!(record.section(SectionKind::Certifications).len(), 1);
        assert!(record.section(SectionKind::Projects).is_empty());
    }
}
