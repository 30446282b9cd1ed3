//! Lenient scalar conversion for schema fields.
//!
//! Values reach a schema from YAML files and from command-line overrides, so a
//! field may see `"5"` where it wants an integer, `yes` where it wants a
//! boolean, or `2024` inside a list of strings. These `deserialize_with`
//! helpers convert the spellings below and reject everything else:
//!
//! | Target | Accepted |
//! |---|---|
//! | `bool` | booleans; integers (`0` is false); `y`/`yes`/`on`/`true`, `n`/`no`/`off`/`false` in any case; integer strings |
//! | `i64` | integers; integer strings |
//! | `f64` | numbers; numeric strings |
//! | `String` | strings; numbers; booleans as `True`/`False` |
//!
//! Floats are not truncated into integers, and booleans are never numbers.

use serde::de::{self, Deserialize, Deserializer, Unexpected};
use serde_json::Value;

pub fn bool_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    to_bool(&value).ok_or_else(|| invalid(&value, "a boolean"))
}

pub fn int_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    to_int(&value).ok_or_else(|| invalid(&value, "an integer"))
}

/// Optional float; null is `None`.
pub fn opt_float_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => to_float(&value)
            .map(Some)
            .ok_or_else(|| invalid(&value, "a float")),
    }
}

pub fn string_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    to_text(&value).ok_or_else(|| invalid(&value, "a string or scalar value"))
}

/// Optional list of strings; null is `None` and every item is converted like
/// [`string_like`].
pub fn opt_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .iter()
            .map(|item| to_text(item).ok_or_else(|| invalid(item, "a string or scalar value")))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        other => Err(invalid(&other, "a list of strings")),
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "on" | "true" => Some(true),
            "n" | "no" | "off" | "false" => Some(false),
            other => other.parse::<i64>().ok().map(|i| i != 0),
        },
        _ => None,
    }
}

fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        _ => None,
    }
}

fn invalid<E: de::Error>(value: &Value, expected: &'static str) -> E {
    let unexpected = match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Unexpected::Signed(i),
            (None, Some(u), _) => Unexpected::Unsigned(u),
            (_, _, Some(f)) => Unexpected::Float(f),
            _ => Unexpected::Other("number"),
        },
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    };
    match value {
        Value::String(_) => E::invalid_value(unexpected, &expected),
        _ => E::invalid_type(unexpected, &expected),
    }
}
