//! Purge runner
//!
//! Deletes every document of a collection.
//!
//! **Two passes:**
//! 1. Cursor-paginated listing of all document ids (`page_size` per page)
//! 2. Deletes issued through [`FanOut`] in windows of `concurrency`
//!
//! Listing everything first keeps pagination stable while deletes run, and
//! means a document whose delete failed is not listed again in the same run.
//! A listing failure ends the run; a failed delete is logged, counted and
//! skipped, never retried.

use super::document_store::DocumentStore;
use crate::error::MigrateResult;
use crate::models::PurgeReport;
use crate::utils::FanOut;
use gad_common::config::MigrateConfig;
use tracing::{debug, error, info};

/// Bulk deleter for one collection
pub struct PurgeRunner<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    collection_id: &'a str,
    page_size: u32,
    fan_out: FanOut,
}

impl<'a, S: DocumentStore + ?Sized> PurgeRunner<'a, S> {
    pub fn new(store: &'a S, collection_id: &'a str, page_size: u32, concurrency: usize) -> Self {
        Self {
            store,
            collection_id,
            page_size: page_size.max(1),
            fan_out: FanOut::new(concurrency),
        }
    }

    pub fn from_config(store: &'a S, config: &'a MigrateConfig) -> Self {
        Self::new(
            store,
            &config.appwrite.collection_id,
            config.page_size,
            config.purge_concurrency,
        )
    }

    /// List every document id in the collection
    pub async fn collect_ids(&self) -> MigrateResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .store
                .list_document_ids(self.collection_id, self.page_size, cursor.as_deref())
                .await?;

            debug!(
                collection = %self.collection_id,
                page_len = page.ids.len(),
                total = page.total,
                "Listed document page"
            );

            let page_len = page.ids.len();
            let Some(last) = page.ids.last().cloned() else {
                break;
            };
            ids.extend(page.ids);

            if page_len < self.page_size as usize {
                break;
            }
            cursor = Some(last);
        }

        info!(collection = %self.collection_id, documents = ids.len(), "Listing complete");
        Ok(ids)
    }

    /// Delete the given documents, one window at a time
    pub async fn delete_ids(&self, ids: &[String]) -> PurgeReport {
        let result = self
            .fan_out
            .run(ids, |id| async move {
                let deleted = self.store.delete_document(self.collection_id, id).await;
                (id, deleted)
            })
            .await;

        let mut report = PurgeReport {
            listed: ids.len(),
            windows: result.windows,
            ..Default::default()
        };

        for (id, deleted) in result.outcomes {
            match deleted {
                Ok(()) => {
                    report.deleted += 1;
                    debug!(document_id = %id, "Document deleted");
                }
                Err(e) => {
                    report.failed += 1;
                    error!(document_id = %id, error = %e, "Document delete failed");
                }
            }
        }

        report
    }

    /// List and delete everything
    pub async fn purge(&self) -> MigrateResult<PurgeReport> {
        let ids = self.collect_ids().await?;
        let report = self.delete_ids(&ids).await;

        info!(
            collection = %self.collection_id,
            listed = report.listed,
            deleted = report.deleted,
            failed = report.failed,
            windows = report.windows,
            "Purge finished"
        );

        Ok(report)
    }
}
