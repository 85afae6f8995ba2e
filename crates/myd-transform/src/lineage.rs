//! Lineage columns: run identity, row sequence, timestamps and row uid.

use std::path::Path;

use chrono::{DateTime, Utc};
use myd_common::{optional_values, set_text_column};
use myd_config::{RunContext, iso_timestamp};
use myd_model::{INGEST_TS, LineageOptions, ROW_ID, RUN_ID, TRANSFORM_TS, UID};
use polars::prelude::DataFrame;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;

/// Modification time of the source file in the run timezone, or the
/// current time when it cannot be read.
pub fn ingest_timestamp(path: Option<&Path>, ctx: &RunContext) -> String {
    let modified = path
        .and_then(|p| std::fs::metadata(p).ok())
        .and_then(|meta| meta.modified().ok())
        .map(|time| DateTime::<Utc>::from(time).with_timezone(&ctx.tz()));
    iso_timestamp(&modified.unwrap_or_else(|| ctx.now()))
}

/// Salted, truncated SHA-256 over the normalized key values.
///
/// Values are trimmed and lower-cased; a null reads as `""`. A `length` of
/// zero keeps the whole digest.
pub fn row_uid(salt: &str, values: &[Option<String>], length: usize) -> String {
    let normalized: Vec<String> = values
        .iter()
        .map(|v| v.as_deref().map(|s| s.trim().to_lowercase()).unwrap_or_default())
        .collect();
    let payload = format!("{salt}|{}", normalized.join("|"));
    let mut digest = hex::encode(Sha256::digest(payload.as_bytes()));
    if length > 0 && length < digest.len() {
        digest.truncate(length);
    }
    digest
}

/// Appends the lineage columns. Does nothing when lineage is disabled.
///
/// `__uid` is only added when uid generation is enabled with at least one
/// key column. Its salt sees identity tokens only, so the uid of a row does
/// not depend on when the run happened.
pub fn stamp_lineage(
    df: &mut DataFrame,
    ctx: &RunContext,
    options: &LineageOptions,
    ingest_ts: &str,
) -> Result<()> {
    if !options.enabled {
        return Ok(());
    }
    let height = df.height();
    set_text_column(df, RUN_ID, vec![ctx.run_id(); height])?;
    set_text_column(df, ROW_ID, (1..=height).map(|i| i.to_string()).collect())?;
    set_text_column(df, INGEST_TS, vec![ingest_ts.to_string(); height])?;
    set_text_column(df, TRANSFORM_TS, vec![iso_timestamp(ctx.started()); height])?;

    let uid = &options.uid;
    if uid.enabled && !uid.keys.is_empty() {
        let salt = ctx.identity_tokens().expand(&uid.salt);
        let key_values: Vec<Vec<Option<String>>> = uid
            .keys
            .iter()
            .map(|key| optional_values(df, key).unwrap_or_else(|_| vec![None; height]))
            .collect();
        let uids: Vec<String> = (0..height)
            .map(|row| {
                let values: Vec<Option<String>> =
                    key_values.iter().map(|col| col[row].clone()).collect();
                row_uid(&salt, &values, uid.length)
            })
            .collect();
        set_text_column(df, UID, uids)?;
    }
    debug!(rows = height, run_id = %ctx.run_id(), "stamped lineage");
    Ok(())
}
