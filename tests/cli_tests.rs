//! End-to-end tests of the command-line front end, without spawning a process.

use clap::Parser;
use schema_config::cli::{self, Cli, PROGRAM_NAME};
use schema_config::config::{ConfigClassC, ConfigSchema, OptionSelector};
use schema_config::error::CliError;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec![PROGRAM_NAME];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("arguments should parse")
}

#[test]
fn json_output_reflects_file_and_overrides() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    fs::write(&path, "a: 5\noption_selector: option_a\n").unwrap();
    let path_str = path.display().to_string();

    let cli = parse(&["--format", "json", &path_str, "b=2.5", "--c"]);
    let output = cli::resolve(&cli).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["a"], 5);
    assert_eq!(value["b"], 2.5);
    assert_eq!(value["c"], true);
    assert_eq!(value["option_selector"], "option_a");
}

#[test]
fn yaml_output_honors_exclude_and_key() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    fs::write(
        &path,
        "training:\n  a: 2\n  config_class_b:\n    - label: keep-out\n",
    )
    .unwrap();
    let path_str = path.display().to_string();

    let cli = parse(&[
        "--key",
        "training",
        "--format",
        "yaml",
        "--exclude",
        "config_class_b",
        &path_str,
    ]);
    let output = cli::resolve(&cli).unwrap();

    assert!(output.contains("a: 2"));
    assert!(!output.contains("keep-out"));
    assert!(!output.contains("config_class_b"));
}

#[test]
fn save_writes_a_reloadable_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    let saved = temp.path().join("resolved.yaml");
    fs::write(&path, "selector: option_b\n").unwrap();
    let path_str = path.display().to_string();
    let saved_str = saved.display().to_string();

    let cli = parse(&["--save", &saved_str, &path_str, "a=42"]);
    cli::resolve(&cli).unwrap();

    let reloaded = ConfigClassC::load::<&str>(&saved, &[], None, true).unwrap();
    assert_eq!(reloaded.a, 42);
    assert_eq!(reloaded.option_selector, OptionSelector::OptionB);
}

#[test]
fn no_validate_paths_lets_missing_globs_through() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    fs::write(
        &path,
        format!(
            "config_class_a:\n  list_a: ${{path.glob:{}/*.absent}}\n",
            temp.path().display()
        ),
    )
    .unwrap();
    let path_str = path.display().to_string();

    let strict = parse(&[&path_str]);
    assert!(cli::resolve(&strict).is_err());

    let lenient = parse(&["--no-validate-paths", "--format", "json", &path_str]);
    let output = cli::resolve(&lenient).unwrap();
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["config_class_a"]["list_a"], Value::Array(Vec::new()));
}

#[test]
fn load_failure_names_the_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    fs::write(&path, "option_selector: nope\n").unwrap();
    let path_str = path.display().to_string();

    let err = cli::resolve(&parse(&[&path_str])).unwrap_err();
    assert!(err.to_string().contains("Failed to load configuration"));
    assert!(format!("{err:#}").contains("nope"));
}

#[test]
fn missing_path_reports_usage() {
    let err = cli::resolve(&parse(&[])).unwrap_err();
    let usage = err.downcast_ref::<CliError>().expect("usage error");
    assert_eq!(
        usage.to_string(),
        format!("Usage: {} [CONFIG_PATH] [OPTIONS]", PROGRAM_NAME)
    );
}
