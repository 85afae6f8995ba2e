//! Data model shared by the myd crates.
//!
//! Holds the untyped configuration tree, typed value rules and meta options,
//! and the per-run outcome types.

pub mod columns;
pub mod filter;
pub mod meta;
pub mod outcome;
pub mod rules;
pub mod tree;

pub use columns::{ERRORS, INGEST_TS, LINEAGE, ROW_ID, RUN_ID, TRANSFORM_TS, UID};
pub use filter::{FilterOp, FilterSpec};
pub use meta::{
    DirOptions, EncodingOptions, JoinHow, JoinSpec, KeyColumns, LineageOptions, MetaOptions,
    NamingOptions, ReportOptions, SheetSelector, SourceSpec, TextOptions, UidOptions,
};
pub use outcome::{RowErrors, RunCounts};
pub use rules::{ColumnMap, ExtensionRef, TransformStep, ValueMap, ValueRule, ValueRules};
pub use tree::{ConfigMap, ConfigNode};
