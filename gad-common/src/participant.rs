//! Participant record model
//!
//! The canonical document shape written to the participants collection.
//! Every text attribute is a `String`: the collection declares them all as
//! string attributes, and the store rejects `null` for those.

use serde::{Deserialize, Serialize};

/// Value of the `source` attribute on documents created by the importer
pub const IMPORT_SOURCE: &str = "import";

/// One participant document
///
/// Serialized with the collection's camelCase attribute keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    /// Derived display name ("First M. Last")
    pub name: String,
    pub student_id: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    /// School or program
    pub school: String,
    pub year: String,
    pub age: String,
    /// Sex or gender as entered
    pub sex: String,
    pub orientation: String,
    pub religion: String,
    pub address: String,
    pub ethnic_group: String,
    pub first_gen: String,

    // Import metadata
    pub created_by: String,
    pub source: String,
    pub is_archived: bool,

    // Linkage placeholders, populated later by the dashboard
    pub academic_period_id: String,
    pub event_id: String,
    pub section: String,
    pub other_ethnic_group: String,
    pub participant_type: String,
}

impl ParticipantRecord {
    /// Empty record carrying the importer's fixed metadata
    pub fn imported_by(created_by: impl Into<String>) -> Self {
        Self {
            created_by: created_by.into(),
            source: IMPORT_SOURCE.to_string(),
            is_archived: false,
            ..Default::default()
        }
    }
}
