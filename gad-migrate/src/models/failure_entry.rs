//! Failure journal entries

use super::source_row::RawRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row that could not be written to the store
///
/// Keeps the raw input untouched so a later replay normalizes it again
/// exactly as the import did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureJournalEntry {
    /// Sheet row number of the failed row
    pub row: usize,

    /// Raw source row
    pub data: RawRow,

    /// Error message reported by the store
    pub error: String,

    /// When the failure was recorded (absent in journals written by older tools)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
}

impl FailureJournalEntry {
    /// Create new entry stamped with the current time
    pub fn new(row: usize, data: RawRow, error: impl Into<String>) -> Self {
        Self {
            row,
            data,
            error: error.into(),
            failed_at: Some(Utc::now()),
        }
    }
}
