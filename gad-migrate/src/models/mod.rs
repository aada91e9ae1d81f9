//! Data models for gad-migrate

pub mod failure_entry;
pub mod run_report;
pub mod source_row;

pub use failure_entry::FailureJournalEntry;
pub use run_report::{CollectionStatus, ProvisionReport, PurgeReport, RunSummary};
pub use source_row::{RawRow, SourceRow};
