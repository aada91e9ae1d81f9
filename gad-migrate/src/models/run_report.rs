//! Run summaries reported at the end of each command

use serde::Serialize;
use std::fmt;

/// Success/failure counters for one import or replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record_success(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed ({} total)",
            self.succeeded, self.failed, self.total
        )
    }
}

/// Outcome of the ensure-collection step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CollectionStatus {
    Created,
    Existing,
    Failed(String),
}

/// Result of one provisioning pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub collection: CollectionStatus,
    /// Attribute keys created by this pass
    pub created: Vec<String>,
    /// Attribute keys that already existed
    pub existing: Vec<String>,
    /// Attribute keys that failed, with the error message
    pub failed: Vec<(String, String)>,
}

impl ProvisionReport {
    pub fn new(collection: CollectionStatus) -> Self {
        Self {
            collection,
            created: Vec::new(),
            existing: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && !matches!(self.collection, CollectionStatus::Failed(_))
    }
}

/// Result of one purge run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    /// Document ids found by the listing pass
    pub listed: usize,
    pub deleted: usize,
    pub failed: usize,
    /// Number of concurrent delete windows issued
    pub windows: usize,
}

impl fmt::Display for PurgeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deleted, {} failed of {} listed ({} windows)",
            self.deleted, self.failed, self.listed, self.windows
        )
    }
}
