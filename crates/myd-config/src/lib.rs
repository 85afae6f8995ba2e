//! Layered configuration for the myd pipeline.
//!
//! Configuration fragments live in layer directories of increasing
//! specificity:
//!
//! ```text
//! config/_shared/             shared defaults
//! config/<object>/_shared/    family defaults
//! config/<object>/<variant>/  family + variant
//! ```
//!
//! Each layer may hold `column_map`, `value_map`, `value_rules` and `meta`
//! fragments. They are deep-merged least specific first and parsed into an
//! [`EffectiveConfig`]. The [`RunContext`] captures the run instant, and
//! [`TokenSet`] expands the file-name templates derived from it.

pub mod context;
pub mod effective;
pub mod error;
pub mod layers;
pub mod load;
pub mod merge;
pub mod naming;
pub mod parse;
pub mod paths;
pub mod target;

pub use context::{RunContext, iso_timestamp, resolve_timezone};
pub use effective::EffectiveConfig;
pub use error::{ConfigError, Result};
pub use layers::{LayerTrace, LayeredConfig, SHARED_DIR, assemble_layers, load_layered};
pub use load::{FragmentKind, load_yaml_file, parse_yaml};
pub use merge::deep_merge;
pub use naming::TokenSet;
pub use paths::{ArtifactPaths, PathOverrides};
pub use target::ObjectVariant;
