//! schema-config
//!
//! Loads a typed configuration from a YAML file plus command-line overrides
//! and prints the resolved result.

use anyhow::Result;
use clap::Parser;
use schema_config::cli::{self, Cli};
use schema_config::logging::{self, LogTarget};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;
    cli::run(&cli)
}
