//! Integration tests for TOML config loading and resolution
//!
//! Covers:
//! - Explicit config file loading and parse failures
//! - Section defaults when a file only sets some keys
//! - Priority order CLI > TOML > compiled default

use gad_common::config::{
    load_toml_config, read_toml_config, ConfigOverrides, ConfigSource, MigrateConfig,
};
use gad_common::Error;
use std::path::PathBuf;
use tempfile::TempDir;

const FULL_CONFIG: &str = r#"
[appwrite]
endpoint = "https://appwrite.example.org/v1"
project_id = "gad-dashboard"
api_key = "standard_abc123"
database_id = "gad"
collection_id = "participants"
timeout_secs = 10

[migration]
journal_path = "journals/failed.json"
created_by = "migration-bot"
page_size = 50
purge_concurrency = 25
ethnic_group_max_len = 300

[logging]
level = "debug"
"#;

#[test]
fn test_load_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("migrate.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let (config, source) = load_toml_config(Some(&path)).unwrap();

    assert_eq!(source, ConfigSource::File(path.clone()));
    assert_eq!(config.appwrite.project_id.as_deref(), Some("gad-dashboard"));
    assert_eq!(config.migration.page_size, Some(50));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let err = load_toml_config(Some(&path)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[appwrite\nproject_id = ").unwrap();

    let err = read_toml_config(&path).unwrap_err();
    match err {
        Error::Config(msg) => assert!(msg.contains("Parse config")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_partial_file_keeps_section_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("partial.toml");
    std::fs::write(&path, "[appwrite]\nproject_id = \"p\"\n").unwrap();

    let config = read_toml_config(&path).unwrap();

    assert_eq!(config.logging.level, "info");
    assert!(config.migration.journal_path.is_none());
    assert!(config.appwrite.api_key.is_none());
}

#[test]
fn test_resolve_full_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("migrate.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();
    let toml_config = read_toml_config(&path).unwrap();

    let config = MigrateConfig::resolve(ConfigOverrides::default(), &toml_config).unwrap();

    assert_eq!(config.appwrite.endpoint, "https://appwrite.example.org/v1");
    assert_eq!(config.appwrite.timeout.as_secs(), 10);
    assert_eq!(config.journal_path, PathBuf::from("journals/failed.json"));
    assert_eq!(config.created_by, "migration-bot");
    assert_eq!(config.page_size, 50);
    assert_eq!(config.import_concurrency, 1);
    assert_eq!(config.purge_concurrency, 25);
    assert_eq!(config.ethnic_group_max_len, 300);
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_cli_beats_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("migrate.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();
    let toml_config = read_toml_config(&path).unwrap();

    let overrides = ConfigOverrides {
        endpoint: Some("http://localhost/v1".to_string()),
        collection_id: Some("participants_staging".to_string()),
        created_by: Some("operator".to_string()),
        ..Default::default()
    };
    let config = MigrateConfig::resolve(overrides, &toml_config).unwrap();

    assert_eq!(config.appwrite.endpoint, "http://localhost/v1");
    assert_eq!(config.appwrite.collection_id, "participants_staging");
    assert_eq!(config.appwrite.database_id, "gad");
    assert_eq!(config.created_by, "operator");
}
