//! Label text resolution.
//!
//! A record may name its class in several places. The first field present
//! wins, in this order:
//!
//! 1. `type`, when it is an object: its first value in document order
//! 2. `labelType`
//! 3. `alias` (only when the caller allows it)
//!
//! The chosen value is then rendered to text. Empty-ish values (null, `""`,
//! `0`, `false`, `[]`, `{}`) resolve to no label. Once a field has been
//! chosen, an empty value does not fall through to a later field.

use serde_json::{Map, Value};

/// Resolve the label text for one record object.
pub fn resolve_label(obj: &Map<String, Value>, allow_alias: bool) -> Option<String> {
    let type_value = match obj.get("type") {
        Some(Value::Object(map)) => map.values().next(),
        _ => None,
    };

    let raw = type_value
        .or_else(|| obj.get("labelType"))
        .or_else(|| if allow_alias { obj.get("alias") } else { None })?;

    label_text(raw)
}

/// Render a JSON value as label text, or `None` if it is empty-ish.
pub fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Bool(true) => Some("True".to_string()),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}
