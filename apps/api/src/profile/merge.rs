//! Revision Merger: reconciles an AI-proposed revision with the original.
//!
//! The proposal is untrusted. Each section is re-normalized through its own
//! schema, and wherever the proposal is absent or malformed the original
//! value is kept: per section, and per field for entries that can be paired
//! with an original entry. The merged record never holds less than the
//! original for anything the proposal did not validly address.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::normalize::achievements::{achievements_to_list, encode_raw_achievements};
use crate::normalize::engine::{is_blank_entity, lookup, resolve};
use crate::normalize::table::stringify_cell;
use crate::normalize::Entity;
use crate::profile::entries::{lookup_section, normalize_others};
use crate::profile::models::CanonicalRecord;
use crate::schema::{personal_info_schema, SectionKind, SUMMARY_FIELD};

const PERSONAL_INFO_KEY: &str = "personal_info";
const OTHERS_KEY: &str = "others";

/// Merges `proposed` into a fresh copy of `original`.
pub fn merge_revision(original: &CanonicalRecord, proposed: &Value) -> CanonicalRecord {
    let Some(proposed) = proposed.as_object() else {
        warn!("proposed revision is not a map, keeping original record");
        return original.clone();
    };

    let mut merged = original.clone();

    for kind in SectionKind::ALL {
        let section = merge_section(kind, original.section(kind), lookup_section(proposed, kind));
        merged.set_section(kind, section);
    }

    if let Some(summary) = proposed_summary(proposed) {
        merged
            .personal_info
            .insert(SUMMARY_FIELD.to_string(), summary);
    }

    merged.others = merge_others(&original.others, proposed.get(OTHERS_KEY));
    merged
}

fn merge_section(kind: SectionKind, original: &[Entity], proposed: Option<&Value>) -> Vec<Entity> {
    let items = match proposed {
        None => return original.to_vec(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(
                section = kind.key(),
                found = %stringify_cell(other).chars().take(40).collect::<String>(),
                "proposed section is not a list, keeping original"
            );
            return original.to_vec();
        }
    };

    let prepared: Vec<Option<Map<String, Value>>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let prepared = match kind {
                SectionKind::Experience => encode_raw_achievements(item),
                _ => item.clone(),
            };
            match prepared {
                // an item with nothing usable of its own is dropped, not back-filled
                Value::Object(raw) if !is_blank_entity(&merge_entry(kind, &raw, None)) => Some(raw),
                Value::Object(_) => None,
                _ => {
                    debug!(section = kind.key(), index, "skipping non-map proposed item");
                    None
                }
            }
        })
        .collect();

    let counterparts = pair_with_originals(kind, original, &prepared);
    let revised: Vec<Entity> = prepared
        .iter()
        .zip(counterparts)
        .filter_map(|(raw, counterpart)| {
            let raw = raw.as_ref()?;
            Some(merge_entry(kind, raw, counterpart.and_then(|i| original.get(i))))
        })
        .collect();

    if revised.is_empty() && !original.is_empty() {
        warn!(
            section = kind.key(),
            "proposed section normalized to nothing, keeping original"
        );
        return original.to_vec();
    }
    revised
}

/// Assigns each proposed item at most one original entry, each original to at
/// most one item.
///
/// Items are first matched by the section's leading field (company,
/// institution, ...), compared case-insensitively. When the proposal kept the
/// same number of entries, an item still unmatched may then take the original
/// at its own position, provided no other item claimed that original by key
/// and the item's own key does not name some other original.
fn pair_with_originals(
    kind: SectionKind,
    original: &[Entity],
    proposed: &[Option<Map<String, Value>>],
) -> Vec<Option<usize>> {
    let Some(key_spec) = kind.schema().fields().first() else {
        return vec![None; proposed.len()];
    };
    let original_keys: Vec<Option<String>> = original
        .iter()
        .map(|entity| entity.get(key_spec.name).and_then(pairing_key))
        .collect();
    let mut claimed = vec![false; original.len()];

    let proposed_keys: Vec<Option<String>> = proposed
        .iter()
        .map(|raw| raw.as_ref().and_then(|raw| lookup(raw, key_spec)).and_then(pairing_key))
        .collect();

    let mut pairs: Vec<Option<usize>> = proposed_keys
        .iter()
        .map(|key| {
            let key = key.as_deref()?;
            let index = (0..original.len())
                .find(|&i| !claimed[i] && original_keys[i].as_deref() == Some(key))?;
            claimed[index] = true;
            Some(index)
        })
        .collect();

    // an item naming a known original never takes a different one by position
    let names_an_original =
        |key: &Option<String>| key.is_some() && original_keys.contains(key);

    if proposed.len() == original.len() {
        for (index, pair) in pairs.iter_mut().enumerate() {
            if pair.is_none()
                && proposed[index].is_some()
                && !claimed[index]
                && !names_an_original(&proposed_keys[index])
            {
                claimed[index] = true;
                *pair = Some(index);
            }
        }
    }
    pairs
}

fn pairing_key(value: &Value) -> Option<String> {
    let key = stringify_cell(value).trim().to_lowercase();
    (!key.is_empty()).then_some(key)
}

fn merge_entry(kind: SectionKind, raw: &Map<String, Value>, counterpart: Option<&Entity>) -> Entity {
    let mut entity: Entity = kind
        .schema()
        .fields()
        .iter()
        .map(|spec| {
            let value = match resolve(spec, lookup(raw, spec)) {
                Ok(v) => v,
                Err(reason) => match counterpart.and_then(|o| o.get(spec.name)) {
                    Some(kept) => {
                        debug!(field = spec.name, %reason, "keeping original value");
                        kept.clone()
                    }
                    None => spec.produce_default(),
                },
            };
            (spec.name.to_string(), value)
        })
        .collect();

    if kind == SectionKind::Experience {
        achievements_to_list(&mut entity);
    }
    entity
}

fn proposed_summary(proposed: &Map<String, Value>) -> Option<Value> {
    let candidate = proposed
        .get(SUMMARY_FIELD)
        .filter(|v| !v.is_null())
        .or_else(|| {
            proposed
                .get(PERSONAL_INFO_KEY)
                .and_then(|p| p.get(SUMMARY_FIELD))
                .filter(|v| !v.is_null())
        })?;

    match candidate {
        Value::String(s) if !s.trim().is_empty() => {
            let spec = personal_info_schema().field(SUMMARY_FIELD)?;
            resolve(spec, Some(candidate)).ok()
        }
        _ => {
            warn!("proposed summary is blank or not a string, keeping original");
            None
        }
    }
}

fn merge_others(original: &Map<String, Value>, proposed: Option<&Value>) -> Map<String, Value> {
    match proposed {
        None | Some(Value::Null) => original.clone(),
        Some(value @ Value::Object(_)) => {
            let normalized = normalize_others(value);
            if normalized.is_empty() && !original.is_empty() {
                warn!("proposed others normalized to nothing, keeping original");
                original.clone()
            } else {
                normalized
            }
        }
        Some(_) => {
            warn!("proposed others is not a map, keeping original");
            original.clone()
        }
    }
}
