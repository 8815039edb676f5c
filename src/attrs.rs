//! Attribute payload decoding
//!
//! Decodes the optional `{...}` JSON object between a block name and the
//! closing `-->`. Decoding never aborts a parse: a payload that is not
//! valid JSON, or is valid JSON but not an object, yields an empty
//! attribute map while the delimiter itself stays recognized.

use serde_json::{Map, Value};

/// Decode a raw attribute payload into an ordered attribute map.
///
/// Key order follows the document; serde_json's `preserve_order` feature
/// keeps the map insertion-ordered.
pub(crate) fn decode(raw: Option<&str>) -> Map<String, Value> {
    let raw = match raw {
        Some(raw) => raw.trim(),
        None => return Map::new(),
    };
    if raw.is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(attrs)) => attrs,
        _ => Map::new(),
    }
}
