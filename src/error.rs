//! Error types for configuration loading.
//!
//! Two families are kept apart so callers can tell "my configuration is bad"
//! from "my setup is bad":
//! - [`ConfigError::Configuration`] for schema, type, override and resolver
//!   failures during merging and materialization.
//! - Everything else (I/O, YAML syntax, key extraction, serialization).

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, materializing or saving a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Schema, type, override or resolver failure.
    #[error("{message}")]
    Configuration { message: String },

    /// The file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not well-formed YAML.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The requested top-level key is absent from the document.
    #[error("key '{key}' not found in {}", path.display())]
    KeyNotFound { key: String, path: PathBuf },

    /// A configuration could not be rendered to a document.
    #[error("failed to serialize configuration: {0}")]
    Serialize(String),
}

impl ConfigError {
    // Convenience constructors

    pub fn configuration(message: impl fmt::Display) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn key_not_found(key: &str, path: impl Into<PathBuf>) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
            path: path.into(),
        }
    }

    pub fn serialize(err: impl fmt::Display) -> Self {
        Self::Serialize(err.to_string())
    }

    /// Whether this error describes bad configuration content rather than
    /// a filesystem or caller problem.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Raised by the path resolvers when validation is enabled and nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PathNotFoundError {
    message: String,
}

impl PathNotFoundError {
    /// A glob pattern expanded to zero paths.
    pub fn no_match(pattern: &str) -> Self {
        Self {
            message: format!("{} does not match any files or dirs", pattern),
        }
    }

    /// None of the candidate paths exist.
    pub fn none_exist(candidates: &[String]) -> Self {
        Self {
            message: candidates.join(", "),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<PathNotFoundError> for io::Error {
    fn from(err: PathNotFoundError) -> Self {
        io::Error::new(io::ErrorKind::NotFound, err)
    }
}

/// Failure reported by a placeholder resolver.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error(transparent)]
    PathNotFound(#[from] PathNotFoundError),

    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("{0}")]
    Other(String),
}

/// Usage error at the command-line entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Usage: {program} [CONFIG_PATH] [OPTIONS]")]
pub struct CliError {
    pub program: String,
}

impl CliError {
    pub fn usage(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_not_found_messages() {
        let err = PathNotFoundError::no_match("data/*.csv");
        assert_eq!(err.to_string(), "data/*.csv does not match any files or dirs");

        let err = PathNotFoundError::none_exist(&["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "a, b");
    }

    #[test]
    fn test_path_not_found_is_not_found_io_kind() {
        let io_err: io::Error = PathNotFoundError::no_match("x").into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_configuration_family() {
        assert!(ConfigError::configuration("bad").is_configuration());
        assert!(!ConfigError::key_not_found("training", "cfg.yaml").is_configuration());
        assert!(
            !ConfigError::io("cfg.yaml", io::Error::from(io::ErrorKind::NotFound))
                .is_configuration()
        );
    }

    #[test]
    fn test_cli_usage_message() {
        let err = CliError::usage("schema-config");
        assert_eq!(err.to_string(), "Usage: schema-config [CONFIG_PATH] [OPTIONS]");
    }
}
