//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Config};

type Builder = LibConfigBuilder<config::builder::DefaultState>;

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: Builder,
    key: &str,
    value: T,
) -> Result<Builder> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

/// Override `key` with the value of environment variable `var`, if set
fn override_from_env(builder: Builder, var: &str, key: &str) -> Result<Builder> {
    match std::env::var(var) {
        Ok(value) => builder
            .set_override(key, value)
            .map_err(|e| Error::config(format!("Failed to set {var}: {e}"))),
        Err(_) => Ok(builder),
    }
}

/// Like [`override_from_env`] for numeric settings; unparsable values are ignored
fn override_number_from_env(builder: Builder, var: &str, key: &str) -> Result<Builder> {
    match std::env::var(var).ok().and_then(|v| v.parse::<i64>().ok()) {
        Some(value) => builder
            .set_override(key, value)
            .map_err(|e| Error::config(format!("Failed to set {var}: {e}"))),
        None => Ok(builder),
    }
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `CINEGRAPH_` and use double underscores
    /// for nested values. For example:
    /// - `CINEGRAPH_AUTH__JWT_SECRET=...`
    /// - `CINEGRAPH_STORAGE__NEO4J_HOST=db.internal`
    ///
    /// The unprefixed `NEO4J_*`, `JWT_SECRET` and `JWT_EXPIRATION_SECS`
    /// variables are honoured last.
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Storage defaults
        let builder = set_config_default(builder, "storage.provider", default_storage_provider())?;
        let builder = set_config_default(builder, "storage.neo4j_host", default_neo4j_host())?;
        let builder = set_config_default(
            builder,
            "storage.neo4j_bolt_port",
            default_neo4j_bolt_port() as i64,
        )?;
        let builder = set_config_default(builder, "storage.neo4j_user", default_neo4j_user())?;
        let builder =
            set_config_default(builder, "storage.neo4j_password", default_neo4j_password())?;

        // Auth defaults (the secret has none)
        let builder = set_config_default(
            builder,
            "auth.token_expiration_secs",
            default_token_expiration_secs() as i64,
        )?;
        let mut builder = set_config_default(
            builder,
            "auth.password_hash_cost",
            default_password_hash_cost() as i64,
        )?;

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with CINEGRAPH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("CINEGRAPH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Neo4j configuration
        builder = override_from_env(builder, "NEO4J_HOST", "storage.neo4j_host")?;
        builder = override_number_from_env(builder, "NEO4J_BOLT_PORT", "storage.neo4j_bolt_port")?;
        builder = override_from_env(builder, "NEO4J_USER", "storage.neo4j_user")?;
        builder = override_from_env(builder, "NEO4J_PASSWORD", "storage.neo4j_password")?;

        // Token configuration
        builder = override_from_env(builder, "JWT_SECRET", "auth.jwt_secret")?;
        builder =
            override_number_from_env(builder, "JWT_EXPIRATION_SECS", "auth.token_expiration_secs")?;

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load and validate configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.cinegraph/config.toml or custom --config path)
    /// 3. Environment variables (CINEGRAPH_*, then NEO4J_* / JWT_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        let config = Self::from_file(&path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
