//! Named placeholder resolvers.
//!
//! A [`ResolverRegistry`] maps resolver names to functions that compute a value
//! from string arguments. Two path resolvers are built in:
//! - `path.glob` expands glob patterns into a sorted list of paths
//! - `path.choose` picks the first URL or existing path among its arguments
//!
//! `path.glob` follows the `glob` crate's pattern rules: `**` as a whole path
//! component is recursive, so `data/**/*.csv` also matches `data/a/b/x.csv`.
//! A non-recursive matcher would read `**` as `*` and stop one level down.
//! Leading dots must be matched literally.
//!
//! Each loader owns its registry, so loaders configured with different
//! `validate_paths` settings never see each other's bindings.

use crate::error::{PathNotFoundError, ResolverError};
use regex_lite::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::warn;

/// Name of the glob-expanding resolver.
pub const PATH_GLOB: &str = "path.glob";

/// Name of the first-existing-path resolver.
pub const PATH_CHOOSE: &str = "path.choose";

/// A function that can be called from a `${name:args}` placeholder.
pub trait Resolver: Send + Sync {
    fn resolve(&self, args: &[String]) -> Result<Value, ResolverError>;
}

impl<F> Resolver for F
where
    F: Fn(&[String]) -> Result<Value, ResolverError> + Send + Sync,
{
    fn resolve(&self, args: &[String]) -> Result<Value, ResolverError> {
        self(args)
    }
}

static URL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[a-z0-9]+://").ok());

/// Whether `path` starts with a `scheme://` prefix.
///
/// Pure string check; no scheme handler needs to exist.
pub fn is_url(path: &str) -> bool {
    URL_PATTERN.as_ref().is_some_and(|re| re.is_match(path))
}

/// Expands glob patterns into a list of matching paths.
#[derive(Debug, Clone, Copy)]
pub struct PathGlob {
    pub validate_paths: bool,
}

impl Resolver for PathGlob {
    fn resolve(&self, args: &[String]) -> Result<Value, ResolverError> {
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..Default::default()
        };

        let mut out = Vec::new();
        for pattern in args {
            let paths =
                glob::glob_with(pattern, options).map_err(|e| ResolverError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;

            let mut matches: Vec<String> = paths
                .filter_map(Result::ok)
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            matches.sort();

            if matches.is_empty() {
                if self.validate_paths {
                    return Err(PathNotFoundError::no_match(pattern).into());
                }
                warn!(pattern = %pattern, "Glob matched nothing; skipping");
            }
            out.extend(matches.into_iter().map(Value::String));
        }
        Ok(Value::Array(out))
    }
}

/// Returns the first argument that is a URL or an existing path.
#[derive(Debug, Clone, Copy)]
pub struct PathChoose {
    pub validate_paths: bool,
}

impl Resolver for PathChoose {
    fn resolve(&self, args: &[String]) -> Result<Value, ResolverError> {
        if let Some(found) = args
            .iter()
            .find(|p| is_url(p) || Path::new(p.as_str()).exists())
        {
            return Ok(Value::String(found.clone()));
        }

        if self.validate_paths {
            return Err(PathNotFoundError::none_exist(args).into());
        }
        warn!(candidates = ?args, "No candidate path exists; using empty string");
        Ok(Value::String(String::new()))
    }
}

/// Registry of named resolvers.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: BTreeMap<String, Arc<dyn Resolver>>,
}

impl ResolverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in path resolvers.
    pub fn with_path_resolvers(validate_paths: bool) -> Self {
        let mut registry = Self::new();
        registry.register_path_resolvers(validate_paths);
        registry
    }

    /// Bind `path.glob` and `path.choose`, replacing any earlier bindings.
    pub fn register_path_resolvers(&mut self, validate_paths: bool) {
        self.register(PATH_GLOB, PathGlob { validate_paths });
        self.register(PATH_CHOOSE, PathChoose { validate_paths });
    }

    /// Bind a resolver under `name`. The last registration wins.
    ///
    /// Returns `true` if an earlier binding was replaced.
    pub fn register(&mut self, name: impl Into<String>, resolver: impl Resolver + 'static) -> bool {
        self.resolvers
            .insert(name.into(), Arc::new(resolver))
            .is_some()
    }

    /// Look up a resolver by name.
    pub fn get(&self, name: &str) -> Option<&dyn Resolver> {
        self.resolvers.get(name).map(|r| r.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
