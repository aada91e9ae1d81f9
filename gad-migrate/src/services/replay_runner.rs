//! Replay runner
//!
//! Re-drives the failed rows recorded in the failure journal through the
//! same normalize + create path as the import.
//!
//! **Journal handling:** by default the journal file is left exactly as it
//! was, including rows that now succeed. Replaying twice without a fresh
//! import therefore creates those rows twice: the store has no notion of
//! source-row identity to dedupe on. Pass [`ReplayOptions::prune`] to
//! rewrite the journal with only the rows that failed again.

use super::document_store::DocumentStore;
use super::document_upserter::DocumentUpserter;
use super::failure_journal::FailureJournal;
use super::row_normalizer::RowNormalizer;
use crate::error::MigrateResult;
use crate::models::{RunSummary, SourceRow};
use crate::utils::FanOut;
use gad_common::config::MigrateConfig;
use tracing::info;

/// Replay options
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Rewrite the journal with only the rows that failed again
    pub prune: bool,
}

/// Replay every journaled row into the configured collection
pub async fn run_replay<S: DocumentStore + ?Sized>(
    store: &S,
    config: &MigrateConfig,
    journal: &FailureJournal,
    options: ReplayOptions,
) -> MigrateResult<RunSummary> {
    let entries = journal.read()?;

    info!(
        journal = %journal.path().display(),
        entries = entries.len(),
        prune = options.prune,
        "Starting replay"
    );

    let rows: Vec<SourceRow> = entries
        .into_iter()
        .map(|entry| SourceRow::new(entry.row, entry.data))
        .collect();

    let normalizer = RowNormalizer::from_config(config);
    let upserter = DocumentUpserter::new(
        store,
        &config.appwrite.collection_id,
        &normalizer,
        FanOut::new(config.import_concurrency),
    );

    let outcome = upserter.upsert_rows(&rows).await;

    if options.prune {
        journal.write(&outcome.failures)?;
    }

    info!(
        total = outcome.summary.total,
        succeeded = outcome.summary.succeeded,
        failed = outcome.summary.failed,
        "Replay finished"
    );

    Ok(outcome.summary)
}
