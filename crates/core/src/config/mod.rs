//! Configuration module for the cinegraph system
//!
//! Configuration can be loaded from TOML files and/or environment variables.
//! The token signing secret and expiration live in [`AuthConfig`] and are
//! handed to the token service at construction.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use defaults::{MAX_PASSWORD_HASH_COST, MIN_PASSWORD_HASH_COST};

use defaults::*;

/// Returns the path to the global configuration file
///
/// Stored at `~/.cinegraph/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".cinegraph").join("config.toml"))
}

/// Main configuration structure for the cinegraph system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Graph store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Credential and session token configuration
    pub auth: AuthConfig,
}

/// Configuration for the graph store
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider type: "neo4j" (default), "mock"
    #[serde(default = "default_storage_provider")]
    pub provider: String,

    /// Neo4j host address
    #[serde(default = "default_neo4j_host")]
    pub neo4j_host: String,

    /// Neo4j Bolt port
    #[serde(default = "default_neo4j_bolt_port")]
    pub neo4j_bolt_port: u16,

    /// Neo4j username
    #[serde(default = "default_neo4j_user")]
    pub neo4j_user: String,

    /// Neo4j password
    #[serde(default = "default_neo4j_password")]
    pub neo4j_password: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            neo4j_host: default_neo4j_host(),
            neo4j_bolt_port: default_neo4j_bolt_port(),
            neo4j_user: default_neo4j_user(),
            neo4j_password: default_neo4j_password(),
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider)
            .field("neo4j_host", &self.neo4j_host)
            .field("neo4j_bolt_port", &self.neo4j_bolt_port)
            .field("neo4j_user", &self.neo4j_user)
            .field("neo4j_password", &"***REDACTED***")
            .finish()
    }
}

impl StorageConfig {
    /// Bolt URI for the configured Neo4j server
    pub fn neo4j_uri(&self) -> String {
        format!("bolt://{}:{}", self.neo4j_host, self.neo4j_bolt_port)
    }
}

/// Configuration for password storage and session tokens
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric secret used to sign and verify session tokens
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_token_expiration_secs")]
    pub token_expiration_secs: u64,

    /// bcrypt work factor for new password hashes
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***REDACTED***")
            .field("token_expiration_secs", &self.token_expiration_secs)
            .field("password_hash_cost", &self.password_hash_cost)
            .finish()
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_expiration_secs: default_token_expiration_secs(),
            password_hash_cost: default_password_hash_cost(),
        }
    }

    pub fn token_expiration(&self) -> Duration {
        Duration::from_secs(self.token_expiration_secs)
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["neo4j", "mock"];
        if !valid_providers.contains(&self.storage.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid storage provider '{}'. Must be one of: {:?}",
                self.storage.provider, valid_providers
            )));
        }

        if self.auth.jwt_secret.trim().is_empty() {
            return Err(Error::config("auth.jwt_secret must not be empty".to_string()));
        }

        if self.auth.token_expiration_secs == 0 {
            return Err(Error::config(
                "auth.token_expiration_secs must be greater than 0".to_string(),
            ));
        }

        // Claims carry i64 timestamps
        if self.auth.token_expiration_secs > i64::MAX as u64 / 2 {
            return Err(Error::config(format!(
                "auth.token_expiration_secs too large (got {})",
                self.auth.token_expiration_secs
            )));
        }

        let cost = self.auth.password_hash_cost;
        if !(MIN_PASSWORD_HASH_COST..=MAX_PASSWORD_HASH_COST).contains(&cost) {
            return Err(Error::config(format!(
                "auth.password_hash_cost must be between {MIN_PASSWORD_HASH_COST} and {MAX_PASSWORD_HASH_COST} (got {cost})"
            )));
        }

        Ok(())
    }
}
