//! Shared error plumbing and time helpers used across all spawnlock crates.

pub mod error;
pub mod time;

pub use {error::FromMessage, time::now_ms};
