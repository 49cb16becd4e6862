use cinegraph_core::config::{
    AuthConfig, Config, StorageConfig, MAX_PASSWORD_HASH_COST, MIN_PASSWORD_HASH_COST,
};
use std::time::Duration;

fn valid_config() -> Config {
    Config {
        storage: StorageConfig::default(),
        auth: AuthConfig::new("integration-secret"),
    }
}

#[test]
fn test_storage_config_defaults() {
    let config = StorageConfig::default();
    assert_eq!(config.provider, "neo4j");
    assert_eq!(config.neo4j_host, "localhost");
    assert_eq!(config.neo4j_bolt_port, 7687);
    assert_eq!(config.neo4j_user, "neo4j");
    assert_eq!(config.neo4j_uri(), "bolt://localhost:7687");
}

#[test]
fn test_auth_config_defaults() {
    let config = AuthConfig::new("secret");
    assert_eq!(config.token_expiration(), Duration::from_secs(86_400));
    assert_eq!(config.password_hash_cost, 10);
}

#[test]
fn test_config_validation_storage_provider() {
    let mut config = valid_config();

    // Valid providers
    config.storage.provider = "neo4j".to_string();
    assert!(config.validate().is_ok());

    config.storage.provider = "mock".to_string();
    assert!(config.validate().is_ok());

    // Invalid provider
    config.storage.provider = "invalid".to_string();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Invalid storage provider"));
}

#[test]
fn test_config_validation_hash_cost_bounds() {
    let mut config = valid_config();

    config.auth.password_hash_cost = MIN_PASSWORD_HASH_COST;
    assert!(config.validate().is_ok());

    config.auth.password_hash_cost = MAX_PASSWORD_HASH_COST;
    assert!(config.validate().is_ok());

    config.auth.password_hash_cost = MIN_PASSWORD_HASH_COST - 1;
    assert!(config.validate().is_err());

    config.auth.password_hash_cost = MAX_PASSWORD_HASH_COST + 1;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_toml_round_trip() {
    let config = valid_config();
    let serialized = toml::to_string(&config).unwrap();
    let parsed = Config::from_toml_str(&serialized).unwrap();

    assert_eq!(parsed.storage.neo4j_uri(), config.storage.neo4j_uri());
    assert_eq!(parsed.auth.jwt_secret, config.auth.jwt_secret);
    assert_eq!(
        parsed.auth.token_expiration_secs,
        config.auth.token_expiration_secs
    );
}
