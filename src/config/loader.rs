//! Configuration loader.
//!
//! Runs the resolution pipeline for a [`ConfigSchema`]:
//! 1. Parse the YAML file into a generic tree
//! 2. Descend into the requested top-level key, if any
//! 3. Apply the schema's legacy migration
//! 4. Merge onto the schema defaults
//! 5. Merge dot-list overrides in order
//! 6. Resolve placeholders
//! 7. Deserialize into the typed structure
//!
//! I/O, YAML syntax and key-extraction failures are reported as their own
//! error kinds. Everything from step 4 on is a [`ConfigError::Configuration`].

use super::interpolation::resolve_tree;
use super::merge::deep_merge_all;
use super::overrides::apply_overrides;
use super::resolvers::{Resolver, ResolverRegistry};
use super::schema::ConfigSchema;
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Loads typed configurations from files and overrides.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolvers available to placeholders
    registry: ResolverRegistry,
    /// Whether path resolvers fail when nothing matches
    validate_paths: bool,
    /// Top-level key to descend into before merging
    key: Option<String>,
    /// `key=value` overrides, applied in order
    overrides: Vec<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader with validating path resolvers and no overrides.
    pub fn new() -> Self {
        Self {
            registry: ResolverRegistry::with_path_resolvers(true),
            validate_paths: true,
            key: None,
            overrides: Vec::new(),
        }
    }

    /// Re-register the path resolvers with the given validation setting.
    pub fn with_validate_paths(mut self, validate_paths: bool) -> Self {
        self.validate_paths = validate_paths;
        self.registry.register_path_resolvers(validate_paths);
        self
    }

    /// Only load the sub-tree under this top-level key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Append `key=value` overrides. Later entries win.
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.extend(overrides.into_iter().map(Into::into));
        self
    }

    /// Register an additional resolver. The last registration under a name wins.
    pub fn with_resolver(mut self, name: impl Into<String>, resolver: impl Resolver + 'static) -> Self {
        self.registry.register(name, resolver);
        self
    }

    pub fn validate_paths(&self) -> bool {
        self.validate_paths
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Read a YAML file into a generic tree.
    ///
    /// Empty or comment-only files yield an empty mapping. `<<` merge keys are
    /// expanded before the tree is handed on.
    pub fn read_document(path: &Path) -> ConfigResult<Value> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let raw: Option<serde_yaml::Value> =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::parse(path, e))?;
        let Some(mut raw) = raw else {
            return Ok(Value::Object(Map::new()));
        };
        raw.apply_merge().map_err(|e| ConfigError::parse(path, e))?;
        serde_yaml::from_value(raw).map_err(|e| ConfigError::parse(path, e))
    }

    /// Load and materialize a configuration from `path`.
    pub fn load<C: ConfigSchema>(&self, path: impl AsRef<Path>) -> ConfigResult<C> {
        let path = path.as_ref();
        let tree = self.load_tree::<C>(path)?;
        let config = Self::materialize(tree)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Run the pipeline up to and including placeholder resolution.
    ///
    /// Returns the merged, fully resolved tree without converting it to `C`.
    pub fn load_tree<C: ConfigSchema>(&self, path: &Path) -> ConfigResult<Value> {
        debug!(path = %path.display(), validate_paths = self.validate_paths, "Reading configuration");
        let mut raw = Self::read_document(path)?;

        if let Some(ref key) = self.key {
            raw = match raw {
                Value::Object(mut map) => match map.remove(key) {
                    // A bare `key:` line reads as null; treat it like an empty section.
                    Some(Value::Null) => Value::Object(Map::new()),
                    Some(sub) => sub,
                    None => return Err(ConfigError::key_not_found(key, path)),
                },
                _ => return Err(ConfigError::key_not_found(key, path)),
            };
            debug!(key = %key, "Extracted sub-tree");
        }

        let migrated = C::update_legacy_settings(raw);
        let merged = deep_merge_all([C::defaults()?, migrated]);
        let merged = if self.overrides.is_empty() {
            merged
        } else {
            debug!(count = self.overrides.len(), "Applying overrides");
            apply_overrides(merged, self.overrides.as_slice())?
        };

        resolve_tree(merged, &self.registry)
    }

    /// Build a configuration from defaults plus an override mapping, without a file.
    ///
    /// The loader's dot-list overrides and key are not used here.
    pub fn from_overrides<C: ConfigSchema>(&self, overrides: Value) -> ConfigResult<C> {
        let merged = deep_merge_all([C::defaults()?, overrides]);
        let resolved = resolve_tree(merged, &self.registry)?;
        Self::materialize(resolved)
    }

    /// Convert a resolved tree into the typed structure, failing on the first error.
    fn materialize<C: ConfigSchema>(tree: Value) -> ConfigResult<C> {
        serde_json::from_value(tree).map_err(ConfigError::configuration)
    }
}
