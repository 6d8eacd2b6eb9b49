//! Achievements text ⟷ list convention.
//!
//! Canonical records hold achievements as a list of strings. Table rows and
//! the schema pass hold them as one text blob with one `- ` bullet per line.
//! Both directions live here so every converter uses the same rules.

use serde_json::Value;

use crate::normalize::engine::Entity;
use crate::normalize::table::stringify_cell;
use crate::schema::{SectionKind, ACHIEVEMENTS_FIELD};

const BULLET_PREFIX: &str = "- ";

/// Joins achievement items as bulleted lines. Blank items are dropped.
pub fn bullets_to_text(items: &[Value]) -> String {
    items
        .iter()
        .map(stringify_cell)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| format!("{BULLET_PREFIX}{s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits bulleted text back into items.
///
/// Each non-blank line loses a leading `"- "` or `"-"` marker if it has one;
/// otherwise the trimmed line is kept as is. Empty text gives an empty list.
pub fn text_to_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.strip_prefix(BULLET_PREFIX)
                .or_else(|| line.strip_prefix('-'))
                .unwrap_or(line)
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Returns a copy of a raw experience item with its achievements list (under
/// the canonical name or the first matching alias) re-encoded as bulleted text.
///
/// This has to run before the schema pass: the achievements field is declared
/// as a string, and the pass would otherwise flatten the list.
pub fn encode_raw_achievements(item: &Value) -> Value {
    let Some(map) = item.as_object() else {
        return item.clone();
    };
    let Some(spec) = SectionKind::Experience.schema().field(ACHIEVEMENTS_FIELD) else {
        return item.clone();
    };

    let found = spec
        .lookup_names()
        .find_map(|name| map.get(name).filter(|v| !v.is_null()).map(|v| (name, v)));

    let mut encoded = map.clone();
    if let Some((key, Value::Array(items))) = found {
        encoded.insert(key.to_string(), Value::String(bullets_to_text(items)));
    }
    Value::Object(encoded)
}

/// Converts an entity's achievements field to its canonical list form.
/// Text is split into bullets; a list is kept; anything else becomes `[]`.
pub fn achievements_to_list(entity: &mut Entity) {
    let list = match entity.get(ACHIEVEMENTS_FIELD) {
        Some(Value::String(text)) => text_to_bullets(text)
            .into_iter()
            .map(Value::String)
            .collect(),
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    entity.insert(ACHIEVEMENTS_FIELD.to_string(), Value::Array(list));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bullets_round_trip() {
        let items = vec![json!("Led X"), json!("Built Y")];
        let text = bullets_to_text(&items);
        assert_eq!(text, "- Led X\n- Built Y");
        assert_eq!(text_to_bullets(&text), vec!["Led X", "Built Y"]);
    }

    #[test]
    fn test_text_to_bullets_marker_variants() {
        let text = "- dashed\n-tight\nplain line\n\n   \n  - indented  ";
        assert_eq!(
            text_to_bullets(text),
            vec!["dashed", "tight", "plain line", "indented"]
        );
    }

    #[test]
    fn test_empty_text_gives_empty_list() {
        assert!(text_to_bullets("").is_empty());
        assert!(text_to_bullets("\n  \n").is_empty());
    }

    #[test]
    fn test_bullets_to_text_skips_blank_items() {
        let items = vec![json!("one"), json!("  "), json!(null), json!("two")];
        assert_eq!(bullets_to_text(&items), "- one\n- two");
    }

    #[test]
    fn test_encode_raw_achievements_uses_alias_key() {
        let item = json!({"company": "Acme", "highlights": ["A", "B"]});
        let encoded = encode_raw_achievements(&item);
        assert_eq!(encoded["highlights"], json!("- A\n- B"));
        assert_eq!(item["highlights"], json!(["A", "B"]));
    }

    #[test]
    fn test_encode_raw_achievements_leaves_text_alone() {
        let item = json!({"achievements": "- already text"});
        assert_eq!(encode_raw_achievements(&item), item);
    }

    #[test]
    fn test_achievements_to_list_from_text_and_missing() {
        let mut entity = Entity::new();
        entity.insert("achievements".into(), json!("- a\n- b"));
        achievements_to_list(&mut entity);
        assert_eq!(entity["achievements"], json!(["a", "b"]));

        let mut empty = Entity::new();
        achievements_to_list(&mut empty);
        assert_eq!(empty["achievements"], json!([]));
    }
}
