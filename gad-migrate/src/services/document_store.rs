//! Remote document store boundary
//!
//! The pipeline only needs a handful of calls; [`DocumentStore`] names
//! exactly those so stages can run against Appwrite or an in-memory store.

use async_trait::async_trait;
use gad_common::SchemaAttributeSpec;
use serde_json::Value;
use thiserror::Error;

/// Remote store errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Collection, attribute or document already exists (HTTP 409)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {status} ({kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be built (bad header value, TLS setup)
    #[error("Client error: {0}")]
    Client(String),
}

impl StoreError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

/// One page of document ids from a cursor-paginated listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPage {
    /// Total documents in the collection as reported by the store
    pub total: u64,
    /// Ids on this page, in listing order
    pub ids: Vec<String>,
}

/// Calls the migration pipeline issues against the document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a collection in the configured database
    async fn create_collection(&self, collection_id: &str, name: &str) -> Result<(), StoreError>;

    /// Create one attribute on a collection
    async fn create_attribute(
        &self,
        collection_id: &str,
        spec: &SchemaAttributeSpec,
    ) -> Result<(), StoreError>;

    /// Create one document with a caller-chosen id
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: &Value,
    ) -> Result<(), StoreError>;

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<(), StoreError>;

    /// List up to `limit` document ids after `cursor_after`
    async fn list_document_ids(
        &self,
        collection_id: &str,
        limit: u32,
        cursor_after: Option<&str>,
    ) -> Result<DocumentPage, StoreError>;
}
