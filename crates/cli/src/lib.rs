//! Library interface for the cinegraph CLI
//!
//! This module exposes internal functions for integration testing while keeping
//! the main binary logic in main.rs.

pub mod init;
pub mod storage_init;

// Re-export commonly needed types for tests
pub use anyhow::Result;
pub use cinegraph_core::config::Config;

use serde::Serialize;

/// Render a command result the way every subcommand prints it
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
