//! Typed configuration loading.
//!
//! A configuration is resolved in layers, later layers winning field by field:
//! 1. **Defaults** - the schema's `Default` impl
//! 2. **File** - a YAML document, optionally scoped to one top-level key and
//!    passed through the schema's legacy migration first
//! 3. **Overrides** - `a.b.c=value` strings, applied in order
//!
//! ## Merge Strategy
//! - Mappings merge recursively
//! - Lists, scalars and explicit nulls replace
//!
//! ## Placeholders
//! After merging, `${name:args}` expressions are evaluated by a per-loader
//! [`ResolverRegistry`]. `path.glob` and `path.choose` are always registered.
//! Re-evaluating them can observe a changed filesystem; no snapshotting is done.

pub mod coerce;
mod interpolation;
mod loader;
mod merge;
mod overrides;
mod resolvers;
mod schema;
mod types;

pub use interpolation::{has_placeholder, resolve_tree};
pub use loader::ConfigLoader;
pub use merge::{deep_merge, deep_merge_all, merge_at_path};
pub use overrides::{Override, apply_overrides, clean_opt, parse_overrides};
pub use resolvers::{
    PATH_CHOOSE, PATH_GLOB, PathChoose, PathGlob, Resolver, ResolverRegistry, is_url,
};
pub use schema::ConfigSchema;
pub use types::*;
