//! Utility modules for gad-migrate

pub mod fan_out;

pub use fan_out::{FanOut, FanOutResult};
