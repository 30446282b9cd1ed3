//! Layering of configuration trees.
//!
//! Mappings combine key by key with the later layer winning. Lists, scalars
//! and nulls from the later layer replace whatever was underneath.

use serde_json::{Map, Value};

/// Lay `overlay` on top of `base`.
///
/// Only mapping-over-mapping recurses. Any other overlay value, including
/// an explicit null or a shorter list, replaces the base value outright.
///
/// ```
/// use schema_config::config::deep_merge;
/// use serde_json::json;
///
/// let defaults = json!({"a": 0, "config_class_a": {"list_a": null}, "config_class_b": [{"label": "x"}]});
/// let file = json!({"config_class_a": {"list_a": ["p"]}, "config_class_b": []});
/// assert_eq!(
///     deep_merge(defaults, file),
///     json!({"a": 0, "config_class_a": {"list_a": ["p"]}, "config_class_b": []})
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(layer)) => {
            for (key, value) in layer {
                let combined = match merged.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                merged.insert(key, combined);
            }
            Value::Object(merged)
        }
        (_, replacement) => replacement,
    }
}

/// Fold [`deep_merge`] over `layers`, starting from an empty mapping.
pub fn deep_merge_all(layers: impl IntoIterator<Item = Value>) -> Value {
    layers
        .into_iter()
        .fold(Value::Object(Map::new()), deep_merge)
}

/// Merge `value` into `root` at the dotted location described by `segments`.
///
/// Missing mappings along the way are created. A numeric segment indexes into
/// an existing array; indexing past its end is an error. The value at the final
/// location is deep-merged, so a mapping override only touches the keys it names.
pub fn merge_at_path(root: &mut Value, segments: &[String], value: Value) -> Result<(), String> {
    let Some((head, rest)) = segments.split_first() else {
        let current = std::mem::take(root);
        *root = deep_merge(current, value);
        return Ok(());
    };

    match root {
        Value::Array(items) => {
            let index: usize = head
                .parse()
                .map_err(|_| format!("'{}' is not a valid list index", head))?;
            let len = items.len();
            let item = items
                .get_mut(index)
                .ok_or_else(|| format!("list index {} out of range (length {})", index, len))?;
            merge_at_path(item, rest, value)
        }
        Value::Object(map) => {
            let child = map.entry(head.clone()).or_insert(Value::Null);
            merge_at_path(child, rest, value)
        }
        other => {
            // Scalars and nulls on the path are replaced by a fresh mapping.
            *other = Value::Object(Map::new());
            merge_at_path(other, segments, value)
        }
    }
}
