// Declarative schema table for personal info, the five entity sections, and
// free-form "others" items. Built once per process; read-only afterwards.

pub mod field;
pub mod sections;

pub use field::{FieldDefault, FieldSpec, FieldType};
pub use sections::{
    others_item_schema, personal_info_schema, SectionKind, SectionSchema, ACHIEVEMENTS_FIELD,
    SUMMARY_FIELD,
};
