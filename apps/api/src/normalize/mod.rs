// Data normalization engine: schema-driven field resolution, table shaping,
// the achievements text convention, and flat form slot arithmetic.
// Everything here is a pure function of its inputs.

pub mod achievements;
pub mod engine;
pub mod layout;
pub mod table;

pub use engine::{
    convert_to_table_format, extract_fields, extract_list_fields, map_form_to_data, Entity,
    FallbackReason,
};
pub use layout::{FlatFormLayout, SectionSlots};
pub use table::{add_row, empty_row, extract_rows, remove_rows, Row};
