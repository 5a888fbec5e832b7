use serde_json::{Map, Value};

/// Token standing in for every scalar leaf.
pub const PLACEHOLDER: &str = "?";

/// Reduce a value to its key structure.
///
/// Mappings keep their keys (re-inserted in sorted order), sequences keep
/// their length, and every scalar or null becomes [`PLACEHOLDER`]. Two
/// documents that differ only in leaf values normalize to the same shape.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut out = Map::with_capacity(entries.len());
            for (key, child) in entries {
                out.insert(key.clone(), normalize(child));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        _ => Value::String(PLACEHOLDER.to_string()),
    }
}
