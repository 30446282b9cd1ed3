//! CLI definition for schema-config.
//!
//! `schema-config [FLAGS] CONFIG_PATH [OPTION=VALUE ...]`
//!
//! Flags go before `CONFIG_PATH`. Everything after it is an override, even
//! when it spells a flag (`cfg.yaml --verbose` sets `verbose=True` in the
//! configuration). Each override is normalized with [`clean_opt`], so
//! `--list-b=x` and `list_b=x` are the same and a bare `flag` means `flag=True`.

use crate::config::{ConfigClassC, ConfigLoader, ConfigSchema, clean_opt};
use crate::error::CliError;
use crate::format::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Program name used in usage messages.
pub const PROGRAM_NAME: &str = "schema-config";

/// Load a typed configuration from YAML plus command-line overrides
#[derive(Parser, Debug)]
#[command(name = PROGRAM_NAME, author, version, about, long_about = None)]
pub struct Cli {
    /// Only load the sub-tree under this top-level key
    #[arg(long)]
    pub key: Option<String>,

    /// Let path resolvers return empty results instead of failing
    #[arg(long)]
    pub no_validate_paths: bool,

    /// How to print the resolved configuration
    #[arg(long, value_enum, default_value_t = OutputFormat::Debug)]
    pub format: OutputFormat,

    /// Top-level field to leave out of yaml/json output (repeatable)
    #[arg(long, value_name = "FIELD")]
    pub exclude: Vec<String>,

    /// Also write the resolved configuration to this YAML file
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,

    /// Path to the YAML configuration file, then overrides as OPTION=VALUE
    /// (dotted keys address nested fields)
    #[arg(
        value_name = "CONFIG_PATH [OPTION=VALUE]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// The first positional argument.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.args.first().map(PathBuf::from)
    }

    /// Normalized overrides, in command-line order.
    pub fn overrides(&self) -> Vec<String> {
        self.args
            .iter()
            .skip(1)
            .map(|arg| clean_opt(arg))
            .collect()
    }

    /// Build the loader described by the flags.
    pub fn loader(&self) -> ConfigLoader {
        let mut loader = ConfigLoader::new()
            .with_validate_paths(!self.no_validate_paths)
            .with_overrides(self.overrides());
        if let Some(ref key) = self.key {
            loader = loader.with_key(key.clone());
        }
        loader
    }
}

/// Load, optionally save, and render the configuration.
pub fn resolve(cli: &Cli) -> Result<String> {
    let config_path = cli
        .config_path()
        .ok_or_else(|| CliError::usage(PROGRAM_NAME))?;

    let loader = cli.loader();
    debug!(
        path = %config_path.display(),
        key = ?loader.key(),
        validate_paths = loader.validate_paths(),
        "Resolving configuration"
    );
    let config: ConfigClassC = loader
        .load(&config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;

    if let Some(ref save_path) = cli.save {
        config.save(save_path)?;
        info!(path = %save_path.display(), "Saved resolved configuration");
    }

    if cli.format == OutputFormat::Debug && !cli.exclude.is_empty() {
        warn!("--exclude only applies to yaml and json output");
    }

    Ok(format::render(&config, cli.format, cli.exclude.as_slice())?)
}

/// Entry point used by `main`: resolve and print.
pub fn run(cli: &Cli) -> Result<()> {
    let output = resolve(cli)?;
    println!("{}", output.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_and_overrides() {
        let cli = Cli::try_parse_from([PROGRAM_NAME, "cfg.yaml", "a=5", "c", "--list-b=x,y"]).unwrap();
        assert_eq!(cli.config_path(), Some(PathBuf::from("cfg.yaml")));
        assert_eq!(cli.overrides(), vec!["a=5", "c=True", "list_b=x,y"]);
    }

    #[test]
    fn test_parse_flags_before_path() {
        let cli = Cli::try_parse_from([
            PROGRAM_NAME,
            "--key",
            "training",
            "--no-validate-paths",
            "--format",
            "yaml",
            "--exclude",
            "config_class_b",
            "cfg.yaml",
        ])
        .unwrap();
        assert_eq!(cli.key.as_deref(), Some("training"));
        assert!(cli.no_validate_paths);
        assert_eq!(cli.format, OutputFormat::Yaml);
        assert_eq!(cli.exclude, vec!["config_class_b"]);
        assert_eq!(cli.config_path(), Some(PathBuf::from("cfg.yaml")));
        assert!(cli.overrides().is_empty());

        let loader = cli.loader();
        assert_eq!(loader.key(), Some("training"));
        assert!(!loader.validate_paths());
    }

    #[test]
    fn test_flags_after_path_are_overrides() {
        let cli = Cli::try_parse_from([PROGRAM_NAME, "cfg.yaml", "--verbose", "--key=x", "-v"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.key, None);
        assert_eq!(cli.overrides(), vec!["verbose=True", "key=x", "v=True"]);
    }

    #[test]
    fn test_missing_config_path_is_usage_error() {
        let cli = Cli::try_parse_from([PROGRAM_NAME]).unwrap();
        let err = resolve(&cli).unwrap_err();
        let usage = err.downcast_ref::<CliError>().expect("CliError");
        assert_eq!(usage.program, PROGRAM_NAME);
    }
}
