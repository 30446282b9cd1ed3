//! schema-config library
//!
//! Typed configuration loading: YAML files merged over schema defaults,
//! dot-list overrides, `${path.glob:...}` / `${path.choose:...}` placeholders.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
