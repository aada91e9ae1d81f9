//! Error types for gad-migrate
//!
//! Only run-level failures live here. A single row that cannot be written
//! is never a `MigrateError`: it is captured as a journal entry and the run
//! continues.

use crate::services::document_store::StoreError;
use thiserror::Error;

/// Run-level error
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Source spreadsheet or failure journal missing or unparsable.
    /// Raised before any remote call is made.
    #[error("Read error: {0}")]
    Read(String),

    /// Remote store failure outside a per-row boundary (listing, connectivity)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Journal serialization error
    #[error("Journal encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// gad-common error
    #[error("Common error: {0}")]
    Common(#[from] gad_common::Error),
}

/// Result type for migration runs
pub type MigrateResult<T> = Result<T, MigrateError>;
