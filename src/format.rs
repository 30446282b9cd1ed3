//! Output formatting for resolved configurations.

use crate::config::ConfigSchema;
use crate::error::{ConfigError, ConfigResult};
use clap::ValueEnum;
use serde_json::Value;
use std::fmt::Debug;

/// How the resolved configuration is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Rust debug representation of the typed structure
    #[default]
    Debug,
    /// YAML document
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Render `config`, dropping `exclude`d top-level fields from YAML and JSON output.
pub fn render<C, S>(config: &C, format: OutputFormat, exclude: &[S]) -> ConfigResult<String>
where
    C: ConfigSchema + Debug,
    S: AsRef<str>,
{
    match format {
        OutputFormat::Debug => Ok(format!("{:#?}", config)),
        OutputFormat::Yaml => {
            let map = config.as_plain_mapping(exclude)?;
            serde_yaml::to_string(&map).map_err(ConfigError::serialize)
        }
        OutputFormat::Json => {
            let map = config.as_plain_mapping(exclude)?;
            serde_json::to_string_pretty(&Value::Object(map)).map_err(ConfigError::serialize)
        }
    }
}
