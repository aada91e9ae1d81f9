//! gad-migrate library interface
//!
//! Bulk participant migration into the GAD dashboard's Appwrite database:
//! spreadsheet ingestion, schema provisioning, document creation with a
//! failure journal, journal replay and collection purge.
//!
//! Exposes public APIs for the `gad-migrate` binary and integration tests.

pub mod cli;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::error::{MigrateError, MigrateResult};
