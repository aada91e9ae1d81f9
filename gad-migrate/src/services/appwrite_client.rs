//! Appwrite REST client
//!
//! Implements [`DocumentStore`] over the Appwrite Databases API using a
//! server API key. Only the endpoints the migration pipeline needs are
//! covered.
//!
//! **Authentication:** `X-Appwrite-Project` and `X-Appwrite-Key` headers on
//! every request.
//!
//! **Conflicts:** Appwrite answers 409 with an error `type` such as
//! `attribute_already_exists`; both are mapped to
//! [`StoreError::AlreadyExists`] so provisioning stays idempotent.

use super::document_store::{DocumentPage, DocumentStore, StoreError};
use async_trait::async_trait;
use gad_common::config::AppwriteConfig;
use gad_common::{AttributeKind, SchemaAttributeSpec};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

const USER_AGENT: &str = concat!("gad-migrate/", env!("CARGO_PKG_VERSION"));
const PROJECT_HEADER: &str = "x-appwrite-project";
const KEY_HEADER: &str = "x-appwrite-key";

/// Error body returned by Appwrite on non-2xx responses
#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

/// Listing response (only the fields we read)
#[derive(Debug, Deserialize)]
struct DocumentList {
    total: u64,
    documents: Vec<DocumentRef>,
}

#[derive(Debug, Deserialize)]
struct DocumentRef {
    #[serde(rename = "$id")]
    id: String,
}

/// Appwrite-backed document store for one database
pub struct AppwriteStore {
    http_client: reqwest::Client,
    endpoint: String,
    database_id: String,
}

impl AppwriteStore {
    pub fn new(config: &AppwriteConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let project = HeaderValue::from_str(&config.project_id)
            .map_err(|e| StoreError::Client(format!("invalid project id: {}", e)))?;
        headers.insert(HeaderName::from_static(PROJECT_HEADER), project);

        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| StoreError::Client(format!("invalid api key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(KEY_HEADER), key);

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            database_id: config.database_id.clone(),
        })
    }

    fn collections_url(&self) -> String {
        format!("{}/databases/{}/collections", self.endpoint, self.database_id)
    }

    fn collection_url(&self, collection_id: &str) -> String {
        format!("{}/{}", self.collections_url(), collection_id)
    }

    /// Pass 2xx responses through, map everything else to a [`StoreError`]
    async fn check(response: Response, subject: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &text, subject))
    }
}

/// Map a failed Appwrite response to a [`StoreError`]
fn error_from_response(status: StatusCode, body: &str, subject: &str) -> StoreError {
    let parsed: Option<AppwriteErrorBody> = serde_json::from_str(body).ok();
    let (message, kind) = match parsed {
        Some(b) => (b.message, b.kind),
        None => (body.to_string(), String::new()),
    };

    if status == StatusCode::CONFLICT || kind.ends_with("_already_exists") {
        return StoreError::AlreadyExists(subject.to_string());
    }

    if status == StatusCode::NOT_FOUND {
        return StoreError::NotFound(if message.is_empty() {
            subject.to_string()
        } else {
            message
        });
    }

    StoreError::Api {
        status: status.as_u16(),
        kind,
        message,
    }
}

fn network_error(e: reqwest::Error) -> StoreError {
    StoreError::Network(e.to_string())
}

/// JSON-encoded query string value (Appwrite 1.5+ query syntax)
fn query(method: &str, values: Value) -> String {
    json!({ "method": method, "values": values }).to_string()
}

#[async_trait]
impl DocumentStore for AppwriteStore {
    async fn create_collection(&self, collection_id: &str, name: &str) -> Result<(), StoreError> {
        tracing::debug!(collection = %collection_id, "Creating collection");

        let response = self
            .http_client
            .post(self.collections_url())
            .json(&json!({
                "collectionId": collection_id,
                "name": name,
                "documentSecurity": false,
            }))
            .send()
            .await
            .map_err(network_error)?;

        Self::check(response, &format!("collection {}", collection_id)).await?;
        Ok(())
    }

    async fn create_attribute(
        &self,
        collection_id: &str,
        spec: &SchemaAttributeSpec,
    ) -> Result<(), StoreError> {
        let (kind, body) = match spec.kind {
            AttributeKind::String => (
                "string",
                json!({
                    "key": spec.key,
                    "size": spec.size.unwrap_or(gad_common::limits::SHORT_TEXT_LEN),
                    "required": spec.required,
                }),
            ),
            AttributeKind::Boolean => (
                "boolean",
                json!({
                    "key": spec.key,
                    "required": spec.required,
                }),
            ),
        };

        let url = format!("{}/attributes/{}", self.collection_url(collection_id), kind);
        tracing::debug!(collection = %collection_id, attribute = %spec.key, url = %url, "Creating attribute");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        Self::check(response, &format!("attribute {}", spec.key)).await?;
        Ok(())
    }

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: &Value,
    ) -> Result<(), StoreError> {
        let response = self
            .http_client
            .post(format!("{}/documents", self.collection_url(collection_id)))
            .json(&json!({
                "documentId": document_id,
                "data": data,
            }))
            .send()
            .await
            .map_err(network_error)?;

        Self::check(response, &format!("document {}", document_id)).await?;
        Ok(())
    }

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<(), StoreError> {
        let response = self
            .http_client
            .delete(format!(
                "{}/documents/{}",
                self.collection_url(collection_id),
                document_id
            ))
            .send()
            .await
            .map_err(network_error)?;

        Self::check(response, &format!("document {}", document_id)).await?;
        Ok(())
    }

    async fn list_document_ids(
        &self,
        collection_id: &str,
        limit: u32,
        cursor_after: Option<&str>,
    ) -> Result<DocumentPage, StoreError> {
        let mut queries = vec![
            ("queries[]", query("limit", json!([limit]))),
            ("queries[]", query("select", json!(["$id"]))),
        ];
        if let Some(cursor) = cursor_after {
            queries.push(("queries[]", query("cursorAfter", json!([cursor]))));
        }

        let response = self
            .http_client
            .get(format!("{}/documents", self.collection_url(collection_id)))
            .query(&queries)
            .send()
            .await
            .map_err(network_error)?;

        let response = Self::check(response, &format!("collection {}", collection_id)).await?;
        let list: DocumentList = response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        Ok(DocumentPage {
            total: list.total,
            ids: list.documents.into_iter().map(|d| d.id).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> AppwriteConfig {
        AppwriteConfig {
            endpoint: "https://appwrite.example.org/v1/".to_string(),
            project_id: "gad".to_string(),
            api_key: "secret".to_string(),
            database_id: "main".to_string(),
            collection_id: "participants".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_client_creation() {
        let store = AppwriteStore::new(&config()).unwrap();
        assert_eq!(
            store.collection_url("participants"),
            "https://appwrite.example.org/v1/databases/main/collections/participants"
        );
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let mut bad = config();
        bad.api_key = "line\nbreak".to_string();
        assert!(matches!(AppwriteStore::new(&bad), Err(StoreError::Client(_))));
    }

    #[test]
    fn test_conflict_maps_to_already_exists() {
        let body = r#"{"message":"Attribute with the requested key already exists.","code":409,"type":"attribute_already_exists"}"#;
        let err = error_from_response(StatusCode::CONFLICT, body, "attribute age");
        assert_eq!(err, StoreError::AlreadyExists("attribute age".to_string()));
    }

    #[test]
    fn test_already_exists_type_without_409() {
        let body = r#"{"message":"exists","code":400,"type":"collection_already_exists"}"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, body, "collection c");
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_validation_error_keeps_message() {
        let body = r#"{"message":"Invalid document structure: Attribute \"age\" has invalid type.","code":400,"type":"document_invalid_structure"}"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, body, "document x");
        match err {
            StoreError::Api { status, kind, message } => {
                assert_eq!(status, 400);
                assert_eq!(kind, "document_invalid_structure");
                assert!(message.contains("invalid type"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_non_json_error_body() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "upstream down", "document x");
        assert_eq!(
            err,
            StoreError::Api {
                status: 502,
                kind: String::new(),
                message: "upstream down".to_string(),
            }
        );
    }

    #[test]
    fn test_query_encoding() {
        assert_eq!(query("limit", json!([100])), r#"{"method":"limit","values":[100]}"#);
    }
}
