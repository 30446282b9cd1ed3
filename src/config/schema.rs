//! The [`ConfigSchema`] trait implemented by every root configuration type.

use super::loader::ConfigLoader;
use crate::error::{ConfigError, ConfigResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;

/// A typed configuration structure with defaults for every field.
///
/// Implementors are plain serde structs. `Default` supplies the schema
/// defaults; deserialization enforces field types, enumeration membership and
/// (with `#[serde(deny_unknown_fields)]`) the set of allowed keys.
pub trait ConfigSchema: Serialize + DeserializeOwned + Default {
    /// Map a freshly loaded legacy document onto the current schema.
    ///
    /// Runs once per load, after key extraction and before merging with
    /// defaults. Must leave current documents unchanged.
    fn update_legacy_settings(raw: Value) -> Value {
        raw
    }

    /// Schema defaults as a generic tree.
    fn defaults() -> ConfigResult<Value> {
        serde_json::to_value(Self::default()).map_err(ConfigError::configuration)
    }

    /// Build from defaults plus an in-memory override mapping. No file is read.
    fn from_overrides(overrides: Value) -> ConfigResult<Self> {
        ConfigLoader::new().from_overrides(overrides)
    }

    /// Load from a YAML file.
    ///
    /// See [`ConfigLoader::load`] for the pipeline and error behavior.
    fn load<S: AsRef<str>>(
        path: impl AsRef<Path>,
        overrides: &[S],
        key: Option<&str>,
        validate_paths: bool,
    ) -> ConfigResult<Self> {
        let mut loader = ConfigLoader::new()
            .with_validate_paths(validate_paths)
            .with_overrides(overrides.iter().map(|s| s.as_ref().to_string()));
        if let Some(key) = key {
            loader = loader.with_key(key);
        }
        loader.load(path)
    }

    /// Render as a YAML document.
    fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml::to_string(self).map_err(ConfigError::serialize)
    }

    /// Save to a YAML file. The file is overwritten in place.
    fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = self.to_yaml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))?;
        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Convert to a plain nested mapping, dropping the named top-level fields.
    ///
    /// Names that are not fields are ignored.
    fn as_plain_mapping<S: AsRef<str>>(&self, exclude: &[S]) -> ConfigResult<Map<String, Value>> {
        match serde_json::to_value(self).map_err(ConfigError::serialize)? {
            Value::Object(mut map) => {
                for name in exclude {
                    map.remove(name.as_ref());
                }
                Ok(map)
            }
            other => Err(ConfigError::serialize(format!(
                "configuration root is not a mapping: {}",
                other
            ))),
        }
    }
}
