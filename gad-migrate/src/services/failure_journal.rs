//! Failure journal
//!
//! A JSON array of [`FailureJournalEntry`] at a fixed path. It is the only
//! state carried between runs.
//!
//! **Write semantics:** every write replaces the whole file. An import run
//! with failures therefore discards the entries of any earlier run; copy the
//! file away first if those are still needed. No temp-file rename is used,
//! so an interrupted write can leave a truncated file, which the next read
//! reports as a [`MigrateError::Read`].

use crate::error::{MigrateError, MigrateResult};
use crate::models::FailureJournalEntry;
use std::path::{Path, PathBuf};

/// Handle on the journal file
#[derive(Debug, Clone)]
pub struct FailureJournal {
    path: PathBuf,
}

impl FailureJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load every entry
    ///
    /// A missing file or invalid JSON is a read error.
    pub fn read(&self) -> MigrateResult<Vec<FailureJournalEntry>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            MigrateError::Read(format!(
                "failure journal {} unreadable: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            MigrateError::Read(format!(
                "failure journal {} is not valid JSON: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Replace the file contents with `entries`
    pub fn write(&self, entries: &[FailureJournalEntry]) -> MigrateResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if self.exists() {
            tracing::warn!(
                journal = %self.path.display(),
                "Overwriting existing failure journal"
            );
        }

        let json = serde_json::to_vec_pretty(entries)?;
        std::fs::write(&self.path, json)?;

        tracing::info!(
            journal = %self.path.display(),
            entries = entries.len(),
            "Failure journal written"
        );

        Ok(())
    }
}
