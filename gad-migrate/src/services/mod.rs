//! Service modules for the participant migration pipeline
//!
//! Leaf to root:
//! - `spreadsheet_reader`: source file → raw rows
//! - `row_normalizer`: raw row → `ParticipantRecord`
//! - `document_store` / `appwrite_client`: remote store boundary
//! - `schema_provisioner`: collection + attribute creation
//! - `document_upserter`: per-row document creation with failure capture
//! - `failure_journal`: durable list of failed rows
//! - `replay_runner`: retries the journaled rows
//! - `purge_runner`: bulk deletion of a collection's documents

pub mod appwrite_client;
pub mod document_store;
pub mod document_upserter;
pub mod failure_journal;
pub mod purge_runner;
pub mod replay_runner;
pub mod row_normalizer;
pub mod schema_provisioner;
pub mod spreadsheet_reader;

pub use appwrite_client::AppwriteStore;
pub use document_store::{DocumentPage, DocumentStore, StoreError};
pub use document_upserter::{run_import, DocumentUpserter, UpsertOutcome};
pub use failure_journal::FailureJournal;
pub use purge_runner::PurgeRunner;
pub use replay_runner::{run_replay, ReplayOptions};
pub use row_normalizer::RowNormalizer;
pub use schema_provisioner::SchemaProvisioner;
pub use spreadsheet_reader::{read_rows, ReaderOptions};
