//! Test Helper Utilities
//!
//! Shared utilities for testing gad-migrate

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod memory_store;

// Re-export commonly used items
pub use fixtures::{
    as_row, journal_entry, participant_row, participant_rows, student_id, test_config, write_csv,
    HEADERS,
};
pub use memory_store::MemoryStore;
