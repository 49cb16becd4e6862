//! Shared fixtures for service tests

use std::sync::Arc;

use cinegraph_core::{AuthConfig, Movie};
use cinegraph_services::Services;
use cinegraph_storage::MockNeo4jClient;
use serde_json::json;

#[allow(dead_code)]
pub const TEST_SECRET: &str = "service-test-secret";

/// Auth settings with the cheapest bcrypt cost so tests stay fast
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        token_expiration_secs: 3600,
        password_hash_cost: 4,
    }
}

/// A fresh mock store and the services wired to it
pub fn setup() -> (Arc<MockNeo4jClient>, Services) {
    let store = Arc::new(MockNeo4jClient::new());
    let services = Services::new(store.clone(), &test_auth_config());
    (store, services)
}

#[allow(dead_code)]
pub fn movie(tmdb_id: &str, title: &str, released: Option<&str>) -> Movie {
    let mut properties = serde_json::Map::new();
    properties.insert("title".to_string(), json!(title));
    if let Some(released) = released {
        properties.insert("released".to_string(), json!(released));
    }
    Movie {
        tmdb_id: tmdb_id.to_string(),
        properties,
    }
}
