//! Source files, rows and configs for pipeline tests

use gad_common::config::{AppwriteConfig, MigrateConfig};
use gad_common::limits;
use gad_migrate::models::{FailureJournalEntry, RawRow, SourceRow};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Header row of the registrar export
pub const HEADERS: [&str; 13] = [
    "Student Number",
    "Last Name",
    "First Name",
    "Middle Name",
    "Program",
    "Year Level",
    "Age",
    "Gender",
    "Sexual Orientation",
    "Religion",
    "Residential Address",
    "Indigenous People",
    "First Generation Student",
];

/// Config pointing at a fake project with the journal at `journal_path`
pub fn test_config(journal_path: impl Into<PathBuf>) -> MigrateConfig {
    MigrateConfig {
        appwrite: AppwriteConfig {
            endpoint: "http://localhost/v1".to_string(),
            project_id: "gad-test".to_string(),
            api_key: "test-key".to_string(),
            database_id: "gad".to_string(),
            collection_id: "participants".to_string(),
            timeout: Duration::from_secs(5),
        },
        journal_path: journal_path.into(),
        created_by: "registrar".to_string(),
        page_size: limits::PAGE_SIZE,
        import_concurrency: limits::IMPORT_CONCURRENCY,
        purge_concurrency: limits::PURGE_CONCURRENCY,
        ethnic_group_max_len: limits::ETHNIC_GROUP_MAX_LEN,
        log_level: "debug".to_string(),
    }
}

/// Raw row for participant `n` with student number `S{n:04}`
pub fn participant_row(n: usize) -> RawRow {
    let value = json!({
        "Student Number": format!("S{n:04}"),
        "Last Name": format!("Last{n}"),
        "First Name": format!("First{n}"),
        "Program": "BS Biology",
        "Year Level": 2,
        "Age": 19,
        "Gender": if n % 2 == 0 { "F" } else { "M" },
    });
    as_row(value)
}

pub fn as_row(value: Value) -> RawRow {
    value.as_object().cloned().unwrap()
}

/// `count` source rows numbered like a sheet with a header (rows 2..)
pub fn participant_rows(count: usize) -> Vec<SourceRow> {
    (0..count)
        .map(|n| SourceRow::new(n + 2, participant_row(n)))
        .collect()
}

pub fn student_id(n: usize) -> String {
    format!("S{n:04}")
}

/// Journal entry for participant `n`
pub fn journal_entry(n: usize) -> FailureJournalEntry {
    FailureJournalEntry::new(n + 2, participant_row(n), "earlier failure")
}

/// Write a CSV with the registrar headers followed by `rows`
pub fn write_csv(path: &Path, rows: &[[&str; 13]]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer.write_record(HEADERS).unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.flush().unwrap();
}
