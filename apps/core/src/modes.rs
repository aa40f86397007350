//! Normalization of the `modes` property.
//!
//! Datasets deliver the mode list as a native JSON array, as a JSON-encoded
//! string (`"[\"Air\",\"Rail\"]"`) or as a comma-separated string
//! (`"Air, Rail"`). Everything downstream works on the normalized list.

use serde_json::Value;

use crate::domain::Mode;

/// Normalizes any supported encoding to a list of tags.
///
/// Known modes are rewritten to their canonical spelling, unknown tags are kept
/// trimmed, duplicates are dropped keeping the first occurrence. Unsupported or
/// malformed encodings yield an empty list.
pub fn normalize_modes(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => normalize_items(items),
        Value::String(text) => normalize_mode_text(text),
        _ => Vec::new(),
    }
}

pub fn normalize_mode_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') {
        return match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => normalize_items(&items),
            _ => Vec::new(),
        };
    }

    if trimmed.contains(['{', '}', '[', ']', '"']) {
        return Vec::new();
    }

    dedupe(trimmed.split(',').filter_map(canonical_tag))
}

/// Parses a normalized list into known modes, skipping unknown tags.
pub fn known_modes(tags: &[String]) -> Vec<Mode> {
    let mut modes = tags
        .iter()
        .filter_map(|tag| Mode::parse(tag))
        .collect::<Vec<_>>();
    modes.sort();
    modes.dedup();
    modes
}

fn normalize_items(items: &[Value]) -> Vec<String> {
    dedupe(items.iter().filter_map(Value::as_str).filter_map(canonical_tag))
}

fn canonical_tag(raw: &str) -> Option<String> {
    let tag = raw.trim();
    if tag.is_empty() {
        return None;
    }
    Some(Mode::parse(tag).map_or_else(|| tag.to_string(), |mode| mode.as_str().to_string()))
}

fn dedupe(tags: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
