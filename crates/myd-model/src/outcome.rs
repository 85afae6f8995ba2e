//! Per-row validation outcome and run counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Violation messages keyed by positional row index.
///
/// A row index absent from the map is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowErrors(BTreeMap<usize, Vec<String>>);

impl RowErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for `row`, keeping earlier messages in order.
    pub fn push(&mut self, row: usize, message: impl Into<String>) {
        self.0.entry(row).or_default().push(message.into());
    }

    pub fn get(&self, row: usize) -> Option<&[String]> {
        self.0.get(&row).map(Vec::as_slice)
    }

    pub fn is_rejected(&self, row: usize) -> bool {
        self.0.contains_key(&row)
    }

    /// Messages joined with `"; "`, or an empty string for a valid row.
    pub fn joined(&self, row: usize) -> String {
        self.get(row).map(|messages| messages.join("; ")).unwrap_or_default()
    }

    /// Number of rejected rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.0.iter().map(|(row, messages)| (*row, messages.as_slice()))
    }
}

/// Row counts returned by a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub total: usize,
    pub valid: usize,
    pub rejected: usize,
}

impl RunCounts {
    pub fn new(valid: usize, rejected: usize) -> Self {
        Self {
            total: valid + rejected,
            valid,
            rejected,
        }
    }
}
