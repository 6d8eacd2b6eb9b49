//! Section schemas and the process-wide schema table.
//!
//! Field order inside each `SectionSchema` is the only source of truth for
//! positional layouts (table rows, flat form slots). Nothing else in the crate
//! should list field names in order.

use std::sync::LazyLock;

use serde::Serialize;

use super::field::FieldSpec;

/// The field set for one entity kind, in canonical order.
#[derive(Debug, Clone)]
pub struct SectionSchema {
    pub entity_name: &'static str,
    fields: Vec<FieldSpec>,
}

impl SectionSchema {
    pub fn new(entity_name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self {
            entity_name,
            fields,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Minimum positional row length: the 1-based index of the last required
    /// field, or 1 when nothing is required.
    pub fn required_row_len(&self) -> usize {
        self.fields
            .iter()
            .rposition(|f| f.required)
            .map(|i| i + 1)
            .unwrap_or(1)
            .min(self.fields.len().max(1))
    }
}

/// The five list-valued sections of a canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Education,
    Experience,
    Skills,
    Projects,
    Certifications,
}

impl SectionKind {
    /// Flat-form order of the sections.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    /// Position of the section in `ALL`.
    pub fn ordinal(self) -> usize {
        match self {
            SectionKind::Education => 0,
            SectionKind::Experience => 1,
            SectionKind::Skills => 2,
            SectionKind::Projects => 3,
            SectionKind::Certifications => 4,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
        }
    }

    /// Other spellings producers use for the section key, checked after `key()`.
    pub fn alternate_keys(self) -> &'static [&'static str] {
        match self {
            SectionKind::Education => &["educations"],
            SectionKind::Experience => &["experiences", "work_experience"],
            SectionKind::Skills => &["skill"],
            SectionKind::Projects => &["project"],
            SectionKind::Certifications => &["certification"],
        }
    }

    pub fn schema(self) -> &'static SectionSchema {
        match self {
            SectionKind::Education => &EDUCATION,
            SectionKind::Experience => &EXPERIENCE,
            SectionKind::Skills => &SKILLS,
            SectionKind::Projects => &PROJECTS,
            SectionKind::Certifications => &CERTIFICATIONS,
        }
    }
}

/// Name of the experience field holding achievement bullets.
pub const ACHIEVEMENTS_FIELD: &str = "achievements";

/// Name of the personal-info field holding the profile summary.
pub const SUMMARY_FIELD: &str = "summary";

pub fn personal_info_schema() -> &'static SectionSchema {
    &PERSONAL_INFO
}

pub fn others_item_schema() -> &'static SectionSchema {
    &OTHERS_ITEM
}

static PERSONAL_INFO: LazyLock<SectionSchema> = LazyLock::new(|| {
    SectionSchema::new(
        "personal_info",
        vec![
            FieldSpec::text("full_name")
                .aliases(&["name", "fullName", "full name"])
                .required(),
            FieldSpec::text("email").aliases(&["email_address", "e-mail", "mail"]),
            FieldSpec::text("phone").aliases(&["phone_number", "telephone", "mobile"]),
            FieldSpec::text("location").aliases(&["address", "city"]),
            FieldSpec::text("linkedin").aliases(&["linkedin_url", "linkedIn"]),
            FieldSpec::text("github").aliases(&["github_url"]),
            FieldSpec::text("website").aliases(&["portfolio", "personal_website", "url"]),
            FieldSpec::text(SUMMARY_FIELD)
                .aliases(&["professional_summary", "objective", "about", "profile"])
                .max_length(4000),
        ],
    )
});

static EDUCATION: LazyLock<SectionSchema> = LazyLock::new(|| {
    SectionSchema::new(
        "education",
        vec![
            FieldSpec::text("institution")
                .aliases(&["school", "university", "college"])
                .required(),
            FieldSpec::text("degree").aliases(&["qualification", "degree_type"]),
            FieldSpec::text("field_of_study").aliases(&["major", "field", "discipline"]),
            FieldSpec::text("start_date").aliases(&["start", "from"]),
            FieldSpec::text("end_date").aliases(&["end", "to", "graduation_date"]),
            FieldSpec::text("gpa").aliases(&["grade", "score"]),
            FieldSpec::text("location"),
            FieldSpec::text("description")
                .aliases(&["details", "notes"])
                .max_length(2000),
        ],
    )
});

static EXPERIENCE: LazyLock<SectionSchema> = LazyLock::new(|| {
    SectionSchema::new(
        "experience",
        vec![
            FieldSpec::text("company")
                .aliases(&["employer", "organization", "organisation"])
                .required(),
            FieldSpec::text("position")
                .aliases(&["title", "role", "job_title"])
                .required(),
            FieldSpec::text("start_date").aliases(&["start", "from"]),
            FieldSpec::text("end_date").aliases(&["end", "to"]),
            FieldSpec::text("location"),
            FieldSpec::text("description")
                .aliases(&["summary", "responsibilities"])
                .max_length(2000),
            // Trailing free-text slot; bullets live here as "- " prefixed lines.
            FieldSpec::text(ACHIEVEMENTS_FIELD)
                .aliases(&["highlights", "accomplishments", "bullets"])
                .max_length(8000),
        ],
    )
});

static SKILLS: LazyLock<SectionSchema> = LazyLock::new(|| {
    SectionSchema::new(
        "skills",
        vec![
            FieldSpec::text("category")
                .aliases(&["name", "group", "area"])
                .required(),
            FieldSpec::text("skills").aliases(&["items", "keywords", "list"]),
            FieldSpec::text("level").aliases(&["proficiency"]),
        ],
    )
});

static PROJECTS: LazyLock<SectionSchema> = LazyLock::new(|| {
    SectionSchema::new(
        "projects",
        vec![
            FieldSpec::text("name")
                .aliases(&["title", "project_name"])
                .required(),
            FieldSpec::text("role"),
            FieldSpec::text("technologies").aliases(&["tech_stack", "tools", "stack"]),
            FieldSpec::text("start_date"),
            FieldSpec::text("end_date"),
            FieldSpec::text("url").aliases(&["link", "repository", "repo"]),
            FieldSpec::text("description")
                .aliases(&["summary", "details"])
                .max_length(2000),
        ],
    )
});

static CERTIFICATIONS: LazyLock<SectionSchema> = LazyLock::new(|| {
    SectionSchema::new(
        "certifications",
        vec![
            FieldSpec::text("name")
                .aliases(&["title", "certification"])
                .required(),
            FieldSpec::text("issuer").aliases(&["organization", "authority", "issued_by"]),
            FieldSpec::text("date").aliases(&["issue_date", "date_issued", "issued"]),
            FieldSpec::text("expiry_date").aliases(&["expires", "expiration_date"]),
            FieldSpec::text("credential_id").aliases(&["credential", "license_number"]),
            FieldSpec::text("url").aliases(&["link", "verification_url"]),
        ],
    )
});

static OTHERS_ITEM: LazyLock<SectionSchema> = LazyLock::new(|| {
    SectionSchema::new(
        "others_item",
        vec![
            FieldSpec::text("title").aliases(&["name"]),
            FieldSpec::text("organization").aliases(&["issuer", "organisation"]),
            FieldSpec::text("date"),
            FieldSpec::text("location"),
            FieldSpec::text("description")
                .aliases(&["details", "summary"])
                .max_length(2000),
            FieldSpec::text("url").aliases(&["link"]),
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    fn all_schemas() -> Vec<&'static SectionSchema> {
        let mut schemas = vec![personal_info_schema(), others_item_schema()];
        schemas.extend(SectionKind::ALL.iter().map(|k| k.schema()));
        schemas
    }

    #[test]
    fn test_every_default_satisfies_declared_type() {
        for schema in all_schemas() {
            for field in schema.fields() {
                let default = field.produce_default();
                assert!(
                    field.field_type.matches(&default),
                    "{}.{} default {default} is not a {}",
                    schema.entity_name,
                    field.name,
                    field.field_type.as_str()
                );
            }
        }
    }

    #[test]
    fn test_field_names_are_unique_per_schema() {
        for schema in all_schemas() {
            let mut names: Vec<_> = schema.field_names().collect();
            names.sort_unstable();
            let before = names.len();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate field in {}", schema.entity_name);
        }
    }

    #[test]
    fn test_achievements_is_last_experience_field() {
        let schema = SectionKind::Experience.schema();
        assert_eq!(schema.position(ACHIEVEMENTS_FIELD), Some(schema.len() - 1));
    }

    #[test]
    fn test_required_row_len_tracks_last_required_field() {
        assert_eq!(SectionKind::Experience.schema().required_row_len(), 2);
        assert_eq!(SectionKind::Education.schema().required_row_len(), 1);
        assert_eq!(others_item_schema().required_row_len(), 1);
    }

    #[test]
    fn test_ordinal_matches_position_in_all() {
        for (i, kind) in SectionKind::ALL.iter().enumerate() {
            assert_eq!(kind.ordinal(), i);
        }
    }

    #[test]
    fn test_section_keys_match_schema_entity_names() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.key(), kind.schema().entity_name);
        }
    }
}
