//! Row-level reshaping for the myd pipeline.
//!
//! Stages run in this order on a frame of nullable string columns:
//!
//! 1. [`Sanitizer`] cleans raw text (optional).
//! 2. [`stamp_lineage`] adds the `__` lineage columns.
//! 3. [`apply_value_map`] substitutes raw values.
//! 4. [`TransformPlan`] runs the per-column transform chains.
//!
//! `custom` steps resolve against an [`ExtensionRegistry`]; unknown ids are
//! rejected when the plan is compiled.

pub mod builtins;
pub mod engine;
pub mod error;
pub mod lineage;
pub mod registry;
pub mod sanitize;
pub mod steps;
pub mod value_map;

pub use engine::{TransformPlan, ensure_columns};
pub use error::{Result, TransformError};
pub use lineage::{ingest_timestamp, row_uid, stamp_lineage};
pub use registry::{ExtensionError, ExtensionRegistry, TransformExtension, ValidatorExtension};
pub use sanitize::{MojibakeHit, NormalForm, Sanitizer, detect_mojibake};
pub use steps::CompiledStep;
pub use value_map::apply_value_map;
