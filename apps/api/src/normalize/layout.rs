//! Flat form layout: every slot offset of the flat form sequence.
//!
//! Offsets are computed from live schema sizes. Consumers ask for a named
//! slot (`section_slots(kind).table`, `others_data_index()`, ...) and never
//! hard-code an index, so adding a field to a schema shifts everything
//! consistently.
//!
//! Slot sequence:
//!
//! ```text
//! [personal fields][spacer]
//! [education raw slots][education table]
//! ... one raw block + table per section, in SectionKind::ALL order ...
//! [others data map][others display table][others selector]
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use serde::Serialize;

use crate::schema::{personal_info_schema, SectionKind};

/// Slots between the personal fields and the first section.
pub const SPACER_SLOTS: usize = 1;

/// Trailing "others" slots: data map, display table, selector state.
pub const OTHERS_SLOTS: usize = 3;

/// Slots owned by one section: its edit-row fields and its embedded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSlots {
    pub section: SectionKind,
    pub raw: Range<usize>,
    pub table: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatFormLayout {
    personal: Range<usize>,
    spacer: usize,
    sections: Vec<SectionSlots>,
    others_data: usize,
    others_table: usize,
    others_selector: usize,
    total: usize,
}

static CURRENT: LazyLock<FlatFormLayout> = LazyLock::new(|| {
    let section_sizes = SectionKind::ALL.map(|kind| kind.schema().len());
    FlatFormLayout::compute(personal_info_schema().len(), section_sizes)
});

impl FlatFormLayout {
    /// The layout derived from the live schema table.
    pub fn current() -> &'static FlatFormLayout {
        &CURRENT
    }

    /// Lays out slots for the given personal field count and per-section
    /// field counts (in `SectionKind::ALL` order).
    pub fn compute(personal_fields: usize, section_fields: [usize; 5]) -> Self {
        let personal = 0..personal_fields;
        let spacer = personal.end;
        let mut cursor = spacer + SPACER_SLOTS;

        let sections = SectionKind::ALL
            .iter()
            .zip(section_fields)
            .map(|(&section, fields)| {
                let raw = cursor..cursor + fields;
                let table = raw.end;
                cursor = table + 1;
                SectionSlots {
                    section,
                    raw,
                    table,
                }
            })
            .collect();

        let others_data = cursor;
        let total = cursor + OTHERS_SLOTS;

        Self {
            personal,
            spacer,
            sections,
            others_data,
            others_table: others_data + 1,
            others_selector: others_data + 2,
            total,
        }
    }

    pub fn personal_range(&self) -> Range<usize> {
        self.personal.clone()
    }

    pub fn spacer_index(&self) -> usize {
        self.spacer
    }

    pub fn section_slots(&self, kind: SectionKind) -> &SectionSlots {
        &self.sections[kind.ordinal()]
    }

    pub fn offset_of_section(&self, kind: SectionKind) -> usize {
        self.section_slots(kind).raw.start
    }

    pub fn others_data_index(&self) -> usize {
        self.others_data
    }

    pub fn others_table_index(&self) -> usize {
        self.others_table
    }

    pub fn others_selector_index(&self) -> usize {
        self.others_selector
    }

    /// Total slot count, including the `SPACER_SLOTS` after the personal
    /// fields and the `OTHERS_SLOTS` at the end.
    pub fn total_len(&self) -> usize {
        self.total
    }
}
