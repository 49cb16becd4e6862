//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

fn with_env_var<F, T>(key: &str, value: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    std::env::set_var(key, value);
    let result = f();
    std::env::remove_var(key);
    result
}

#[test]
fn test_from_toml_str_valid() {
    let toml = r#"
        [storage]
        provider = "mock"
        neo4j_host = "graph.internal"

        [auth]
        jwt_secret = "s3cr3t"
        token_expiration_secs = 3600
        password_hash_cost = 4
    "#;

    let config = Config::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(config.storage.provider, "mock");
    assert_eq!(config.storage.neo4j_host, "graph.internal");
    assert_eq!(config.auth.token_expiration_secs, 3600);
    assert_eq!(config.auth.password_hash_cost, 4);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_minimal() {
    let toml = r#"
        [auth]
        jwt_secret = "s3cr3t"
    "#;

    let config = Config::from_toml_str(toml).expect("Failed to parse minimal TOML");
    // Check defaults are applied
    assert_eq!(config.storage.provider, "neo4j");
    assert_eq!(config.storage.neo4j_bolt_port, 7687);
    assert_eq!(config.storage.neo4j_uri(), "bolt://localhost:7687");
    assert_eq!(config.auth.token_expiration_secs, 86_400);
    assert_eq!(config.auth.password_hash_cost, 10);
}

#[test]
fn test_from_toml_str_missing_secret() {
    let toml = r#"
        [auth]
        token_expiration_secs = 60
    "#;

    let result = Config::from_toml_str(toml);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to parse TOML"));
}

#[test]
fn test_from_toml_str_invalid_syntax() {
    let toml = r#"
        [auth
        jwt_secret = "x"
    "#;

    assert!(Config::from_toml_str(toml).is_err());
}

#[test]
fn test_validate_rejects_empty_secret() {
    let config = Config {
        storage: StorageConfig::default(),
        auth: AuthConfig::new("   "),
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("jwt_secret"));
}

#[test]
fn test_validate_rejects_zero_expiration() {
    let mut auth = AuthConfig::new("secret");
    auth.token_expiration_secs = 0;
    let config = Config {
        storage: StorageConfig::default(),
        auth,
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_cost_out_of_range() {
    for cost in [0, 3, 32] {
        let mut auth = AuthConfig::new("secret");
        auth.password_hash_cost = cost;
        let config = Config {
            storage: StorageConfig::default(),
            auth,
        };
        assert!(config.validate().is_err(), "cost {cost} should be rejected");
    }
}

#[test]
fn test_validate_rejects_unknown_provider() {
    let config = Config {
        storage: StorageConfig {
            provider: "postgres".to_string(),
            ..StorageConfig::default()
        },
        auth: AuthConfig::new("secret"),
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Invalid storage provider"));
}

#[test]
fn test_debug_redacts_secrets() {
    let config = Config {
        storage: StorageConfig {
            neo4j_password: "hunter2".to_string(),
            ..StorageConfig::default()
        },
        auth: AuthConfig::new("very-secret-signing-key"),
    };
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains("very-secret-signing-key"));
}

#[test]
fn test_from_file_applies_defaults() -> Result<()> {
    let file = create_temp_config_file(
        r#"
        [auth]
        jwt_secret = "file-secret"
        "#,
    )?;

    let config = Config::from_file(file.path())?;
    assert_eq!(config.storage.provider, "neo4j");
    assert_eq!(config.storage.neo4j_bolt_port, 7687);
    assert_eq!(config.auth.password_hash_cost, 10);
    Ok(())
}

#[test]
fn test_from_file_neo4j_host_env_override() -> Result<()> {
    let file = create_temp_config_file(
        r#"
        [storage]
        neo4j_host = "from-file"

        [auth]
        jwt_secret = "file-secret"
        "#,
    )?;

    let config = with_env_var("NEO4J_HOST", "from-env", || Config::from_file(file.path()))?;
    assert_eq!(config.storage.neo4j_host, "from-env");
    Ok(())
}

#[test]
fn test_auth_config_token_expiration() {
    let mut auth = AuthConfig::new("secret");
    auth.token_expiration_secs = 90;
    assert_eq!(auth.token_expiration(), std::time::Duration::from_secs(90));
}
