//! In-memory DocumentStore with failure injection

use async_trait::async_trait;
use gad_common::SchemaAttributeSpec;
use gad_migrate::services::{DocumentPage, DocumentStore, StoreError};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    collections: HashSet<String>,
    attributes: HashSet<(String, String)>,
    attribute_calls: Vec<String>,
    /// (document id, data) in creation order
    documents: Vec<(String, Value)>,
    fail_student_ids: HashSet<String>,
    fail_attributes: HashSet<String>,
    fail_deletes: HashSet<String>,
    fail_collection_create: bool,
    fail_listing: bool,
}

/// Store double recording every write
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    delete_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject documents whose `studentId` is in `ids`
    pub fn fail_student_ids(self, ids: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_student_ids
            .extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn fail_attributes(self, keys: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_attributes
            .extend(keys.iter().map(|s| s.to_string()));
        self
    }

    pub fn fail_deletes(self, ids: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_deletes
            .extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn fail_collection_create(self) -> Self {
        self.state.lock().unwrap().fail_collection_create = true;
        self
    }

    pub fn fail_listing(self) -> Self {
        self.state.lock().unwrap().fail_listing = true;
        self
    }

    /// Seed `count` documents with ids `doc-0000`, `doc-0001`, ...
    pub fn with_documents(self, count: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for i in 0..count {
                state
                    .documents
                    .push((format!("doc-{i:04}"), Value::Object(Default::default())));
            }
        }
        self
    }

    /// Stop rejecting every previously injected student id
    pub fn heal_student_ids(&self) {
        self.state.lock().unwrap().fail_student_ids.clear();
    }

    pub fn documents(&self) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .documents
            .iter()
            .map(|(_, data)| data.clone())
            .collect()
    }

    pub fn document_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .documents
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// `studentId` of every stored document, in creation order
    pub fn student_ids(&self) -> Vec<String> {
        self.documents()
            .iter()
            .map(|d| d["studentId"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn has_collection(&self, id: &str) -> bool {
        self.state.lock().unwrap().collections.contains(id)
    }

    pub fn attribute_keys(&self, collection_id: &str) -> HashSet<String> {
        self.state
            .lock()
            .unwrap()
            .attributes
            .iter()
            .filter(|(c, _)| c == collection_id)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Every attribute key passed to `create_attribute`, in call order
    pub fn attribute_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().attribute_calls.clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Hold an in-flight slot across one scheduler yield so concurrent
    /// calls in the same window overlap
    async fn in_flight_yield(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

fn rejected(message: &str) -> StoreError {
    StoreError::Api {
        status: 400,
        kind: "document_invalid_structure".to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_collection(&self, collection_id: &str, _name: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_collection_create {
            return Err(StoreError::Api {
                status: 401,
                kind: "general_unauthorized_scope".to_string(),
                message: "missing scope (collections.write)".to_string(),
            });
        }
        if !state.collections.insert(collection_id.to_string()) {
            return Err(StoreError::AlreadyExists(format!("collection {collection_id}")));
        }
        Ok(())
    }

    async fn create_attribute(
        &self,
        collection_id: &str,
        spec: &SchemaAttributeSpec,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.attribute_calls.push(spec.key.clone());
        if state.fail_attributes.contains(&spec.key) {
            return Err(rejected(&format!("attribute {} rejected", spec.key)));
        }
        if !state
            .attributes
            .insert((collection_id.to_string(), spec.key.clone()))
        {
            return Err(StoreError::AlreadyExists(format!("attribute {}", spec.key)));
        }
        Ok(())
    }

    async fn create_document(
        &self,
        _collection_id: &str,
        document_id: &str,
        data: &Value,
    ) -> Result<(), StoreError> {
        self.in_flight_yield().await;

        let mut state = self.state.lock().unwrap();
        let student_id = data["studentId"].as_str().unwrap_or_default();
        if state.fail_student_ids.contains(student_id) {
            return Err(rejected(&format!("student {student_id} rejected")));
        }
        state.documents.push((document_id.to_string(), data.clone()));
        Ok(())
    }

    async fn delete_document(&self, _collection_id: &str, document_id: &str) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight_yield().await;

        let mut state = self.state.lock().unwrap();
        if state.fail_deletes.contains(document_id) {
            return Err(StoreError::Network(format!("connection reset deleting {document_id}")));
        }
        let before = state.documents.len();
        state.documents.retain(|(id, _)| id != document_id);
        if state.documents.len() == before {
            return Err(StoreError::NotFound(format!("document {document_id}")));
        }
        Ok(())
    }

    async fn list_document_ids(
        &self,
        _collection_id: &str,
        limit: u32,
        cursor_after: Option<&str>,
    ) -> Result<DocumentPage, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(StoreError::Network("listing timed out".to_string()));
        }

        let start = match cursor_after {
            Some(cursor) => match state.documents.iter().position(|(id, _)| id == cursor) {
                Some(pos) => pos + 1,
                None => return Err(StoreError::NotFound(format!("cursor {cursor}"))),
            },
            None => 0,
        };

        Ok(DocumentPage {
            total: state.documents.len() as u64,
            ids: state.documents[start..]
                .iter()
                .take(limit as usize)
                .map(|(id, _)| id.clone())
                .collect(),
        })
    }
}
