//! gad-migrate - Main entry point
//!
//! Bulk participant migration into the GAD dashboard's Appwrite database.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gad_common::config::{load_toml_config, ConfigSource, MigrateConfig};
use gad_common::schema::{CollectionSchema, ParticipantsCollectionSchema};
use gad_migrate::cli::{Cli, Command};
use gad_migrate::services::{
    read_rows, run_import, run_replay, AppwriteStore, FailureJournal, PurgeRunner, ReaderOptions,
    ReplayOptions, SchemaProvisioner,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config file is read before tracing starts: it carries the log level
    let (toml_config, source) = load_toml_config(cli.config.as_deref())
        .context("Failed to load configuration file")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let level = &toml_config.logging.level;
                format!("gad_migrate={level},gad_common={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gad-migrate v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(_) => info!("Configuration: {}", source),
        ConfigSource::Defaults => warn!("No config file found, using flags, environment and defaults"),
    }

    let config = MigrateConfig::resolve(cli.overrides(), &toml_config)
        .context("Failed to resolve configuration")?;
    info!(
        "Target: {} database={} collection={}",
        config.appwrite.endpoint, config.appwrite.database_id, config.appwrite.collection_id
    );

    let store = AppwriteStore::new(&config.appwrite).context("Failed to build Appwrite client")?;
    let journal = FailureJournal::new(&config.journal_path);

    match cli.command {
        Command::Provision => {
            let specs = ParticipantsCollectionSchema::expected_attributes(config.ethnic_group_max_len);
            let report = SchemaProvisioner::new(&store)
                .provision(
                    &config.appwrite.collection_id,
                    ParticipantsCollectionSchema::collection_name(),
                    &specs,
                )
                .await;

            println!(
                "Provisioned {}: {} created, {} existing, {} failed",
                config.appwrite.collection_id,
                report.created.len(),
                report.existing.len(),
                report.failed.len()
            );
            for (key, error) in &report.failed {
                println!("  {key}: {error}");
            }
        }

        Command::Import {
            file,
            sheet,
            no_headers,
        } => {
            let options = ReaderOptions {
                has_headers: !no_headers,
                sheet,
            };
            let rows = tokio::task::spawn_blocking(move || read_rows(&file, &options))
                .await
                .context("Spreadsheet reader task failed")??;

            let summary = run_import(&store, &config, &journal, &rows).await?;
            println!("Import: {summary}");
            if summary.failed > 0 {
                println!("Failed rows written to {}", journal.path().display());
            }
        }

        Command::Replay { prune } => {
            let summary = run_replay(&store, &config, &journal, ReplayOptions { prune }).await?;
            println!("Replay: {summary}");
        }

        Command::Purge { yes } => {
            if !yes {
                bail!(
                    "Refusing to delete every document in {} without --yes",
                    config.appwrite.collection_id
                );
            }
            warn!(collection = %config.appwrite.collection_id, "Purging collection");

            let report = PurgeRunner::from_config(&store, &config).purge().await?;
            println!("Purge: {report}");
        }
    }

    Ok(())
}
