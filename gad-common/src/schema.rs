//! Collection Schema Definitions
//!
//! Single source of truth for the attributes provisioned on remote
//! collections. Each schema struct lists the attributes one collection is
//! expected to carry; the provisioner creates whichever are missing.
//!
//! # Usage
//!
//! ```rust,ignore
//! let attributes = ParticipantsCollectionSchema::expected_attributes(500);
//! provisioner.provision(&collection_id, &attributes).await;
//! ```

use crate::limits::{ADDRESS_LEN, SHORT_TEXT_LEN};
use serde::{Deserialize, Serialize};

/// Attribute type on the remote collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    String,
    Boolean,
}

/// One attribute to provision on a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaAttributeSpec {
    /// Attribute key
    pub key: String,
    /// Attribute type
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    /// Required flag (always false for imported fields)
    pub required: bool,
    /// Maximum length (string attributes only)
    pub size: Option<u32>,
}

impl SchemaAttributeSpec {
    /// Optional string attribute with the given maximum length
    pub fn string(key: impl Into<String>, size: u32) -> Self {
        Self {
            key: key.into(),
            kind: AttributeKind::String,
            required: false,
            size: Some(size),
        }
    }

    /// Optional boolean attribute
    pub fn boolean(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: AttributeKind::Boolean,
            required: false,
            size: None,
        }
    }
}

/// Defines the expected attributes of one collection
pub trait CollectionSchema {
    /// Display name used when the collection has to be created
    fn collection_name() -> &'static str;

    /// Expected attributes, in provisioning order
    fn expected_attributes(ethnic_group_max_len: usize) -> Vec<SchemaAttributeSpec>;
}

/// Participants collection schema
pub struct ParticipantsCollectionSchema;

impl CollectionSchema for ParticipantsCollectionSchema {
    fn collection_name() -> &'static str {
        "participants"
    }

    fn expected_attributes(ethnic_group_max_len: usize) -> Vec<SchemaAttributeSpec> {
        let ethnic_size = u32::try_from(ethnic_group_max_len).unwrap_or(u32::MAX);

        vec![
            SchemaAttributeSpec::string("name", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("studentId", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("lastName", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("firstName", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("middleName", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("school", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("year", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("age", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("sex", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("orientation", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("religion", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("address", ADDRESS_LEN),
            SchemaAttributeSpec::string("ethnicGroup", ethnic_size),
            SchemaAttributeSpec::string("firstGen", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("createdBy", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("source", SHORT_TEXT_LEN),
            SchemaAttributeSpec::boolean("isArchived"),
            // Linkage placeholders
            SchemaAttributeSpec::string("academicPeriodId", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("eventId", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("section", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("otherEthnicGroup", SHORT_TEXT_LEN),
            SchemaAttributeSpec::string("participantType", SHORT_TEXT_LEN),
        ]
    }
}
