//! Configuration types and structures.
//!
//! The schema loaded by the `schema-config` binary. Every struct carries
//! `#[serde(default, deny_unknown_fields)]`: absent fields fall back to
//! `Default`, unknown keys are rejected. Scalar fields go through
//! [`coerce`](super::coerce) so `"5"`, `yes` or `2024` land in the field's type.

use super::coerce;
use super::schema::ConfigSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Assign config from a pre-defined set of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionSelector {
    /// The default option.
    #[default]
    Default,
    /// The first alternative.
    OptionA,
    /// The second alternative.
    OptionB,
}

impl OptionSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionSelector::Default => "default",
            OptionSelector::OptionA => "option_a",
            OptionSelector::OptionB => "option_b",
        }
    }
}

impl fmt::Display for OptionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested configuration holding an optional list of strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigClassA {
    /// A list of strings.
    #[serde(deserialize_with = "coerce::opt_string_list")]
    pub list_a: Option<Vec<String>>,
}

/// Entry type for [`ConfigClassC::config_class_b`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigClassB {
    /// Label of this entry. Scalar numbers and booleans are stored as text.
    #[serde(deserialize_with = "coerce::string_like")]
    pub label: String,

    /// List within this entry.
    #[serde(deserialize_with = "coerce::opt_string_list")]
    pub list_b: Option<Vec<String>>,
}

impl Default for ConfigClassB {
    fn default() -> Self {
        Self {
            label: default_label(),
            list_b: None,
        }
    }
}

fn default_label() -> String {
    "0.0".to_string()
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigClassC {
    /// Option A.
    #[serde(deserialize_with = "coerce::int_like")]
    pub a: i64,

    /// Option B.
    #[serde(deserialize_with = "coerce::opt_float_like")]
    pub b: Option<f64>,

    /// Option C.
    #[serde(deserialize_with = "coerce::bool_like")]
    pub c: bool,

    /// Choice from a closed set of options.
    pub option_selector: OptionSelector,

    /// A nested configuration.
    pub config_class_a: ConfigClassA,

    /// A list of nested configurations (e.g. several evaluators).
    pub config_class_b: Vec<ConfigClassB>,
}

impl ConfigSchema for ConfigClassC {
    /// Older files spelled `option_selector` as `selector` and allowed
    /// `config_class_a.list_a` to be a single string.
    fn update_legacy_settings(raw: Value) -> Value {
        let mut map = match raw {
            Value::Object(map) => map,
            other => return other,
        };

        if let Some(selector) = map.remove("selector") {
            map.entry("option_selector").or_insert(selector);
        }

        if let Some(Value::Object(class_a)) = map.get_mut("config_class_a")
            && let Some(list_a) = class_a.get_mut("list_a")
            && let Value::String(single) = list_a
        {
            let single = std::mem::take(single);
            *list_a = Value::Array(vec![Value::String(single)]);
        }

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ConfigClassC::default();
        assert_eq!(config.a, 0);
        assert_eq!(config.b, None);
        assert!(!config.c);
        assert_eq!(config.option_selector, OptionSelector::Default);
        assert_eq!(config.config_class_a.list_a, None);
        assert!(config.config_class_b.is_empty());
        assert_eq!(ConfigClassB::default().label, "0.0");
    }

    #[test]
    fn test_option_selector_display_matches_serialized() {
        for selector in [
            OptionSelector::Default,
            OptionSelector::OptionA,
            OptionSelector::OptionB,
        ] {
            let serialized = serde_json::to_value(selector).unwrap();
            assert_eq!(serialized, json!(selector.to_string()));
        }
        assert_eq!(OptionSelector::OptionA.to_string(), "option_a");
    }

    #[test]
    fn test_option_selector_is_case_sensitive() {
        assert!(serde_json::from_value::<OptionSelector>(json!("option_b")).is_ok());
        assert!(serde_json::from_value::<OptionSelector>(json!("OPTION_B")).is_err());
    }

    #[test]
    fn test_label_accepts_scalars() {
        let b: ConfigClassB = serde_json::from_value(json!({"label": 3})).unwrap();
        assert_eq!(b.label, "3");
        let b: ConfigClassB = serde_json::from_value(json!({"label": true})).unwrap();
        assert_eq!(b.label, "True");
        let b: ConfigClassB = serde_json::from_value(json!({})).unwrap();
        assert_eq!(b.label, "0.0");
        assert!(serde_json::from_value::<ConfigClassB>(json!({"label": [1]})).is_err());
    }

    #[test]
    fn test_scalar_fields_are_converted() {
        let config: ConfigClassC = serde_json::from_value(json!({
            "a": "5",
            "b": 2,
            "c": "yes",
            "config_class_a": {"list_a": [2024, 2025]},
            "config_class_b": [{"list_b": [1.5, false]}]
        }))
        .unwrap();
        assert_eq!(config.a, 5);
        assert_eq!(config.b, Some(2.0));
        assert!(config.c);
        assert_eq!(
            config.config_class_a.list_a,
            Some(vec!["2024".to_string(), "2025".to_string()])
        );
        assert_eq!(
            config.config_class_b[0].list_b,
            Some(vec!["1.5".to_string(), "False".to_string()])
        );
        assert!(serde_json::from_value::<ConfigClassC>(json!({"a": 1.5})).is_err());
        assert!(serde_json::from_value::<ConfigClassC>(json!({"c": "perhaps"})).is_err());
    }

    #[test]
    fn test_legacy_settings_migrated() {
        let raw = json!({
            "selector": "option_a",
            "config_class_a": {"list_a": "only"}
        });
        let migrated = ConfigClassC::update_legacy_settings(raw);
        assert_eq!(
            migrated,
            json!({
                "option_selector": "option_a",
                "config_class_a": {"list_a": ["only"]}
            })
        );
    }

    #[test]
    fn test_legacy_settings_leave_current_documents_unchanged() {
        let current = json!({
            "a": 1,
            "option_selector": "option_b",
            "config_class_a": {"list_a": ["x", "y"]},
            "config_class_b": [{"label": "l"}]
        });
        assert_eq!(ConfigClassC::update_legacy_settings(current.clone()), current);
        assert_eq!(ConfigClassC::update_legacy_settings(json!(null)), json!(null));
    }

    #[test]
    fn test_current_key_wins_over_legacy_key() {
        let raw = json!({"selector": "option_a", "option_selector": "option_b"});
        let migrated = ConfigClassC::update_legacy_settings(raw);
        assert_eq!(migrated, json!({"option_selector": "option_b"}));
    }
}
