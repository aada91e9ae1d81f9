//! Configuration loading and resolution
//!
//! Every setting is resolved with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`GAD_*`, surfaced through the CLI parser)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The result is one [`MigrateConfig`] value, loaded once at process start
//! and passed explicitly to every pipeline stage.

use crate::limits;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default Appwrite endpoint (Appwrite Cloud)
pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

/// Default failure journal location, relative to the working directory
pub const DEFAULT_JOURNAL_PATH: &str = "failed_imports.json";

/// TOML configuration file contents
///
/// Every field is optional; anything missing falls through to the
/// compiled defaults during [`MigrateConfig::resolve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub appwrite: AppwriteSection,

    #[serde(default)]
    pub migration: MigrationSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[appwrite]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppwriteSection {
    pub endpoint: Option<String>,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub collection_id: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[migration]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationSection {
    pub journal_path: Option<PathBuf>,
    pub created_by: Option<String>,
    pub page_size: Option<u32>,
    pub import_concurrency: Option<usize>,
    pub purge_concurrency: Option<usize>,
    pub ethnic_group_max_len: Option<usize>,
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where the TOML configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No file found; compiled defaults only
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "compiled defaults"),
        }
    }
}

/// Default config file path for the platform
///
/// `~/.config/gad/migrate.toml` on Linux, the equivalent per-user config
/// directory elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gad").join("migrate.toml"))
}

/// Load the TOML config file
///
/// An explicitly requested file must exist and parse. When no file is
/// requested the platform default is tried; a missing default file is not
/// an error and yields [`ConfigSource::Defaults`].
pub fn load_toml_config(explicit: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let config = read_toml_config(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = read_toml_config(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        _ => Ok((TomlConfig::default(), ConfigSource::Defaults)),
    }
}

/// Read and parse one TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config {} failed: {}", path.display(), e)))
}

/// Values supplied on the command line or through `GAD_*` variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub collection_id: Option<String>,
    pub journal_path: Option<PathBuf>,
    pub created_by: Option<String>,
}

/// Connection settings for the Appwrite REST API
#[derive(Clone)]
pub struct AppwriteConfig {
    /// Base URL including the `/v1` suffix
    pub endpoint: String,
    pub project_id: String,
    /// Server API key, sent as `X-Appwrite-Key`
    pub api_key: String,
    pub database_id: String,
    pub collection_id: String,
    pub timeout: Duration,
}

impl fmt::Debug for AppwriteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppwriteConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("collection_id", &self.collection_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fully resolved configuration for one migration run
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    pub appwrite: AppwriteConfig,
    /// Failure journal file (overwritten by each import that has failures)
    pub journal_path: PathBuf,
    /// Value of `createdBy` on imported documents
    pub created_by: String,
    /// Documents per listing page
    pub page_size: u32,
    /// Concurrent creates during import and replay
    pub import_concurrency: usize,
    /// Concurrent deletes per purge window
    pub purge_concurrency: usize,
    /// Maximum `ethnicGroup` length
    pub ethnic_group_max_len: usize,
    pub log_level: String,
}

impl MigrateConfig {
    /// Resolve the final configuration from overrides, TOML and defaults
    pub fn resolve(overrides: ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let section = &toml_config.appwrite;
        let migration = &toml_config.migration;

        let endpoint = pick(overrides.endpoint, section.endpoint.as_ref())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let appwrite = AppwriteConfig {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: require(overrides.project_id, section.project_id.as_ref(), "project_id", "GAD_PROJECT_ID")?,
            api_key: require(overrides.api_key, section.api_key.as_ref(), "api_key", "GAD_API_KEY")?,
            database_id: require(overrides.database_id, section.database_id.as_ref(), "database_id", "GAD_DATABASE_ID")?,
            collection_id: require(overrides.collection_id, section.collection_id.as_ref(), "collection_id", "GAD_COLLECTION_ID")?,
            timeout: Duration::from_secs(section.timeout_secs.unwrap_or(limits::REQUEST_TIMEOUT_SECS)),
        };

        let journal_path = overrides
            .journal_path
            .or_else(|| migration.journal_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JOURNAL_PATH));

        let created_by = pick(overrides.created_by, migration.created_by.as_ref()).unwrap_or_default();

        let config = Self {
            appwrite,
            journal_path,
            created_by,
            page_size: migration.page_size.unwrap_or(limits::PAGE_SIZE),
            import_concurrency: migration.import_concurrency.unwrap_or(limits::IMPORT_CONCURRENCY),
            purge_concurrency: migration.purge_concurrency.unwrap_or(limits::PURGE_CONCURRENCY),
            ethnic_group_max_len: migration.ethnic_group_max_len.unwrap_or(limits::ETHNIC_GROUP_MAX_LEN),
            log_level: toml_config.logging.level.clone(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject limits the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }
        if self.import_concurrency == 0 {
            return Err(Error::Config("import_concurrency must be at least 1".to_string()));
        }
        if self.purge_concurrency == 0 {
            return Err(Error::Config("purge_concurrency must be at least 1".to_string()));
        }
        if self.ethnic_group_max_len == 0 {
            return Err(Error::Config("ethnic_group_max_len must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Validate a setting value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

fn pick(cli: Option<String>, toml_value: Option<&String>) -> Option<String> {
    cli.filter(|v| is_valid_value(v))
        .or_else(|| toml_value.filter(|v| is_valid_value(v)).cloned())
}

fn require(
    cli: Option<String>,
    toml_value: Option<&String>,
    key: &str,
    env_var: &str,
) -> Result<String> {
    pick(cli, toml_value).ok_or_else(|| {
        Error::Config(format!(
            "{key} not configured. Set it using one of:\n\
             1. Command line: --{flag}\n\
             2. Environment: {env_var}=...\n\
             3. TOML config: [appwrite] {key} = \"...\"",
            flag = key.replace('_', "-").trim_end_matches("-id"),
        ))
    })
}
