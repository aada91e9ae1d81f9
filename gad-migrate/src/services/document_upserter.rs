//! Document upserter
//!
//! Creates one participant document per source row.
//!
//! **Per-row error isolation:** a row the store rejects is logged, counted
//! and captured as a [`FailureJournalEntry`]; the run carries on with the
//! next row. Only failures outside a row (reading the source, writing the
//! journal) end the run.
//!
//! Rows go through [`FanOut`]; with the default concurrency of 1 they are
//! written strictly in source order. Outcomes are collected in source order
//! for any concurrency, so journal entries always follow the sheet.

use super::document_store::{DocumentStore, StoreError};
use super::failure_journal::FailureJournal;
use super::row_normalizer::RowNormalizer;
use crate::error::MigrateResult;
use crate::models::{FailureJournalEntry, RawRow, RunSummary, SourceRow};
use crate::utils::FanOut;
use gad_common::config::MigrateConfig;
use tracing::{error, info};
use uuid::Uuid;

/// Counters plus captured failures of one upsert pass
#[derive(Debug, Default)]
pub struct UpsertOutcome {
    pub summary: RunSummary,
    /// Failed rows in source order
    pub failures: Vec<FailureJournalEntry>,
}

/// Opaque unique document id (32 hex chars, within Appwrite's 36-char limit)
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Writes normalized rows to one collection
pub struct DocumentUpserter<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    collection_id: &'a str,
    normalizer: &'a RowNormalizer,
    fan_out: FanOut,
}

impl<'a, S: DocumentStore + ?Sized> DocumentUpserter<'a, S> {
    pub fn new(
        store: &'a S,
        collection_id: &'a str,
        normalizer: &'a RowNormalizer,
        fan_out: FanOut,
    ) -> Self {
        Self {
            store,
            collection_id,
            normalizer,
            fan_out,
        }
    }

    /// Normalize and create one row; returns the new document id
    pub async fn create_one(&self, data: &RawRow) -> Result<String, StoreError> {
        let record = self.normalizer.normalize(data);
        let payload = serde_json::to_value(&record).map_err(|e| StoreError::Parse(e.to_string()))?;
        let document_id = new_document_id();

        self.store
            .create_document(self.collection_id, &document_id, &payload)
            .await?;

        Ok(document_id)
    }

    /// Create a document for every row
    pub async fn upsert_rows(&self, rows: &[SourceRow]) -> UpsertOutcome {
        let result = self
            .fan_out
            .run(rows, |source| async move {
                let written = self.create_one(&source.data).await;
                (source, written)
            })
            .await;

        let mut outcome = UpsertOutcome::default();

        for (source, written) in result.outcomes {
            match written {
                Ok(document_id) => {
                    outcome.summary.record_success();
                    info!(row = source.row, document_id = %document_id, "Row imported");
                }
                Err(e) => {
                    outcome.summary.record_failure();
                    error!(row = source.row, error = %e, "Row import failed");
                    outcome.failures.push(FailureJournalEntry::new(
                        source.row,
                        source.data.clone(),
                        e.to_string(),
                    ));
                }
            }
        }

        outcome
    }
}

/// Import `rows` into the configured collection
///
/// Failures are flushed to the journal at the end of the run, replacing its
/// previous contents. A run without failures leaves the journal untouched.
pub async fn run_import<S: DocumentStore + ?Sized>(
    store: &S,
    config: &MigrateConfig,
    journal: &FailureJournal,
    rows: &[SourceRow],
) -> MigrateResult<RunSummary> {
    let normalizer = RowNormalizer::from_config(config);
    let upserter = DocumentUpserter::new(
        store,
        &config.appwrite.collection_id,
        &normalizer,
        FanOut::new(config.import_concurrency),
    );

    info!(
        collection = %config.appwrite.collection_id,
        rows = rows.len(),
        concurrency = config.import_concurrency,
        "Starting import"
    );

    let outcome = upserter.upsert_rows(rows).await;

    if !outcome.failures.is_empty() {
        journal.write(&outcome.failures)?;
    }

    info!(
        total = outcome.summary.total,
        succeeded = outcome.summary.succeeded,
        failed = outcome.summary.failed,
        "Import finished"
    );

    Ok(outcome.summary)
}
