//! Reserved column names added by the pipeline.

pub const RUN_ID: &str = "__run_id";
pub const ROW_ID: &str = "__row_id";
pub const INGEST_TS: &str = "__ingest_ts";
pub const TRANSFORM_TS: &str = "__transform_ts";
pub const UID: &str = "__uid";

/// Consolidated validation messages on rejected rows.
pub const ERRORS: &str = "__errors";

/// Lineage columns in the order they are stamped.
pub const LINEAGE: &[&str] = &[RUN_ID, ROW_ID, INGEST_TS, TRANSFORM_TS, UID];
