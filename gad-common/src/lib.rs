//! # GAD Common Library
//!
//! Shared code for the GAD participant migration tools including:
//! - Error types
//! - Configuration loading (TOML + environment + CLI overrides)
//! - Participant record model
//! - Collection schema definitions
//! - Named remote API limits

pub mod config;
pub mod error;
pub mod limits;
pub mod participant;
pub mod schema;

pub use error::{Error, Result};
pub use participant::ParticipantRecord;
pub use schema::{AttributeKind, SchemaAttributeSpec};
