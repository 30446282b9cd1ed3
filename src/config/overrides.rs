//! Dot-list overrides (`a.b.c=value`) from the command line.

use super::interpolation::has_placeholder;
use super::merge::merge_at_path;
use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::str::FromStr;

/// Normalize a raw command-line argument into a `key=value` override.
///
/// - An argument without `=` becomes a flag: `foo` → `foo=True`
/// - Leading and trailing dashes are stripped from the key
/// - Remaining dashes in the key become underscores
///
/// The value is left untouched.
pub fn clean_opt(arg: &str) -> String {
    let (name, value) = arg.split_once('=').unwrap_or((arg, "True"));
    let name = name.trim_matches('-').replace('-', "_");
    format!("{}={}", name, value)
}

/// A single parsed override.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    /// Dotted path split into segments.
    pub path: Vec<String>,
    /// Value parsed as a YAML scalar or flow collection.
    pub value: Value,
}

impl FromStr for Override {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, raw)) = s.split_once('=') else {
            return Err(ConfigError::configuration(format!(
                "invalid override '{}': expected key=value",
                s
            )));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::configuration(format!(
                "invalid override '{}': empty key",
                s
            )));
        }

        let path: Vec<String> = key.split('.').map(str::to_string).collect();
        if path.iter().any(String::is_empty) {
            return Err(ConfigError::configuration(format!(
                "invalid override '{}': empty path segment in '{}'",
                s, key
            )));
        }

        Ok(Self {
            path,
            value: parse_value(raw),
        })
    }
}

/// Parse an override value the way a YAML document would read it.
///
/// Empty values are null. Placeholder expressions and anything that is not
/// valid YAML are kept as plain strings.
fn parse_value(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    if has_placeholder(raw) {
        return Value::String(raw.to_string());
    }
    serde_yaml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parse every override up front so a malformed entry fails before any merging.
pub fn parse_overrides<S: AsRef<str>>(overrides: &[S]) -> ConfigResult<Vec<Override>> {
    overrides.iter().map(|s| s.as_ref().parse()).collect()
}

/// Merge overrides onto `base` in list order; later entries win.
pub fn apply_overrides<S: AsRef<str>>(mut base: Value, overrides: &[S]) -> ConfigResult<Value> {
    for ov in parse_overrides(overrides)? {
        let dotted = ov.path.join(".");
        merge_at_path(&mut base, &ov.path, ov.value).map_err(|reason| {
            ConfigError::configuration(format!("cannot apply override '{}': {}", dotted, reason))
        })?;
        tracing::debug!(key = %dotted, "Applied override");
    }
    Ok(base)
}
