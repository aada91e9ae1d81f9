//! Row normalizer
//!
//! Maps one raw spreadsheet row onto a [`ParticipantRecord`].
//!
//! **Rules:**
//! - Columns are matched by their literal header text; a renamed column
//!   simply produces an empty field
//! - Missing or empty cells become `""`
//! - Numbers are stringified the way the sheet displays them (`20.0` → `"20"`)
//! - `ethnicGroup` is cut to the configured maximum length without warning,
//!   since longer values are rejected by the collection
//! - Nothing else is validated: a non-numeric age passes through as-is

use crate::models::RawRow;
use gad_common::config::MigrateConfig;
use gad_common::ParticipantRecord;
use serde_json::Value;

/// Source column headers
pub mod columns {
    pub const STUDENT_NUMBER: &str = "Student Number";
    pub const LAST_NAME: &str = "Last Name";
    pub const FIRST_NAME: &str = "First Name";
    pub const MIDDLE_NAME: &str = "Middle Name";
    pub const PROGRAM: &str = "Program";
    pub const YEAR_LEVEL: &str = "Year Level";
    pub const AGE: &str = "Age";
    pub const GENDER: &str = "Gender";
    pub const SEXUAL_ORIENTATION: &str = "Sexual Orientation";
    pub const RELIGION: &str = "Religion";
    pub const RESIDENTIAL_ADDRESS: &str = "Residential Address";
    pub const INDIGENOUS_PEOPLE: &str = "Indigenous People";
    pub const FIRST_GENERATION: &str = "First Generation Student";
}

/// Raw row → participant record
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    created_by: String,
    ethnic_group_max_len: usize,
}

impl RowNormalizer {
    pub fn new(created_by: impl Into<String>, ethnic_group_max_len: usize) -> Self {
        Self {
            created_by: created_by.into(),
            ethnic_group_max_len,
        }
    }

    pub fn from_config(config: &MigrateConfig) -> Self {
        Self::new(config.created_by.clone(), config.ethnic_group_max_len)
    }

    pub fn normalize(&self, row: &RawRow) -> ParticipantRecord {
        let first_name = cell_text(row, columns::FIRST_NAME);
        let middle_name = cell_text(row, columns::MIDDLE_NAME);
        let last_name = cell_text(row, columns::LAST_NAME);

        ParticipantRecord {
            name: display_name(&first_name, &middle_name, &last_name),
            student_id: cell_text(row, columns::STUDENT_NUMBER),
            school: cell_text(row, columns::PROGRAM),
            year: cell_text(row, columns::YEAR_LEVEL),
            age: cell_text(row, columns::AGE),
            sex: cell_text(row, columns::GENDER),
            orientation: cell_text(row, columns::SEXUAL_ORIENTATION),
            religion: cell_text(row, columns::RELIGION),
            address: cell_text(row, columns::RESIDENTIAL_ADDRESS),
            ethnic_group: truncate_chars(
                &cell_text(row, columns::INDIGENOUS_PEOPLE),
                self.ethnic_group_max_len,
            ),
            first_gen: cell_text(row, columns::FIRST_GENERATION),
            first_name,
            middle_name,
            last_name,
            ..ParticipantRecord::imported_by(self.created_by.clone())
        }
    }
}

/// Text of one cell, `""` when the column is absent
pub fn cell_text(row: &RawRow, column: &str) -> String {
    row.get(column).map(value_to_string).unwrap_or_default()
}

/// Stringify a cell value
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
            }
        }
        other => other.to_string(),
    }
}

fn format_float(f: f64) -> String {
    // Integral values below 2^53 print without a fractional part
    if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

/// "First M. Last"; empty parts are skipped
pub fn display_name(first: &str, middle: &str, last: &str) -> String {
    let initial = middle
        .trim()
        .chars()
        .next()
        .map(|c| format!("{}.", c))
        .unwrap_or_default();

    [first.trim(), initial.as_str(), last.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `max` characters of `value`
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte_index, _)) => value[..byte_index].to_string(),
        None => value.to_string(),
    }
}
