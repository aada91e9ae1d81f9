//! Schema provisioner
//!
//! Ensures a collection exists and carries every expected attribute.
//!
//! **Idempotent:** "already exists" from the store counts as success, for
//! the collection and for each attribute, so a provisioning pass can be
//! re-run at any time.
//!
//! **Partial failure isolation:** an attribute that fails for any other
//! reason is logged and reported; the remaining attributes are still
//! attempted. Nothing is rolled back.

use super::document_store::DocumentStore;
use crate::models::{CollectionStatus, ProvisionReport};
use gad_common::SchemaAttributeSpec;
use tracing::{error, info, warn};

/// Applies attribute specs to a collection
pub struct SchemaProvisioner<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> SchemaProvisioner<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create the collection if missing
    pub async fn ensure_collection(&self, collection_id: &str, name: &str) -> CollectionStatus {
        match self.store.create_collection(collection_id, name).await {
            Ok(()) => {
                info!(collection = %collection_id, "Collection created");
                CollectionStatus::Created
            }
            Err(e) if e.is_already_exists() => {
                info!(collection = %collection_id, "Collection already exists");
                CollectionStatus::Existing
            }
            Err(e) => {
                // Attributes are still attempted: the collection may exist
                // even though the key lacks permission to create one
                warn!(collection = %collection_id, error = %e, "Could not create collection");
                CollectionStatus::Failed(e.to_string())
            }
        }
    }

    /// Create every attribute in `specs`, in order
    pub async fn provision_attributes(
        &self,
        collection_id: &str,
        specs: &[SchemaAttributeSpec],
        report: &mut ProvisionReport,
    ) {
        for spec in specs {
            match self.store.create_attribute(collection_id, spec).await {
                Ok(()) => {
                    info!(collection = %collection_id, attribute = %spec.key, "Attribute created");
                    report.created.push(spec.key.clone());
                }
                Err(e) if e.is_already_exists() => {
                    info!(collection = %collection_id, attribute = %spec.key, "Attribute already exists, skipping");
                    report.existing.push(spec.key.clone());
                }
                Err(e) => {
                    error!(collection = %collection_id, attribute = %spec.key, error = %e, "Attribute creation failed");
                    report.failed.push((spec.key.clone(), e.to_string()));
                }
            }
        }
    }

    /// Ensure collection, then attributes
    pub async fn provision(
        &self,
        collection_id: &str,
        name: &str,
        specs: &[SchemaAttributeSpec],
    ) -> ProvisionReport {
        let collection = self.ensure_collection(collection_id, name).await;
        let mut report = ProvisionReport::new(collection);

        self.provision_attributes(collection_id, specs, &mut report).await;

        info!(
            collection = %collection_id,
            created = report.created.len(),
            existing = report.existing.len(),
            failed = report.failed.len(),
            "Provisioning complete"
        );

        report
    }
}
