//! Command-line interface
//!
//! Every connection setting can come from a flag, a `GAD_*` environment
//! variable (clap `env`), or the TOML config file. Flags and environment
//! beat the file; see `gad_common::config::MigrateConfig::resolve`.

use clap::{Args, Parser, Subcommand};
use gad_common::config::ConfigOverrides;
use std::path::PathBuf;

/// Command-line arguments for gad-migrate
#[derive(Parser, Debug)]
#[command(name = "gad-migrate")]
#[command(about = "Bulk participant migration for the GAD dashboard")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ~/.config/gad/migrate.toml)
    #[arg(long, global = true, env = "GAD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection and run overrides
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Appwrite endpoint URL
    #[arg(long, global = true, env = "GAD_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Appwrite project id
    #[arg(long = "project", global = true, env = "GAD_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Appwrite server API key
    #[arg(long, global = true, env = "GAD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Target database id
    #[arg(long = "database", global = true, env = "GAD_DATABASE_ID")]
    pub database_id: Option<String>,

    /// Target collection id
    #[arg(long = "collection", global = true, env = "GAD_COLLECTION_ID")]
    pub collection_id: Option<String>,

    /// Failure journal path
    #[arg(long = "journal", global = true, env = "GAD_JOURNAL_PATH")]
    pub journal_path: Option<PathBuf>,

    /// Value written to `createdBy` on imported documents
    #[arg(long, global = true, env = "GAD_CREATED_BY")]
    pub created_by: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the participants collection and its attributes
    Provision,

    /// Import a spreadsheet (xlsx, xls, ods, csv)
    Import {
        /// Source file
        file: PathBuf,

        /// Worksheet name (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// First row is data, not headers
        #[arg(long)]
        no_headers: bool,
    },

    /// Retry the rows recorded in the failure journal
    Replay {
        /// Rewrite the journal with only the rows that failed again
        #[arg(long)]
        prune: bool,
    },

    /// Delete every document in the collection
    Purge {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Flag/environment values for config resolution
    pub fn overrides(&self) -> ConfigOverrides {
        let c = self.connection.clone();
        ConfigOverrides {
            endpoint: c.endpoint,
            project_id: c.project_id,
            api_key: c.api_key,
            database_id: c.database_id,
            collection_id: c.collection_id,
            journal_path: c.journal_path,
            created_by: c.created_by,
        }
    }
}
