//! Test utilities for storage layer integration tests

use cinegraph_core::{config::StorageConfig, Movie};
use neo4rs::Query;
use serde_json::json;
use uuid::Uuid;

/// Build a StorageConfig for a live Neo4j from the usual environment variables
pub fn create_storage_config() -> StorageConfig {
    let defaults = StorageConfig::default();
    StorageConfig {
        provider: "neo4j".to_string(),
        neo4j_host: std::env::var("NEO4J_HOST").unwrap_or(defaults.neo4j_host),
        neo4j_bolt_port: std::env::var("NEO4J_BOLT_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.neo4j_bolt_port),
        neo4j_user: std::env::var("NEO4J_USER").unwrap_or(defaults.neo4j_user),
        neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(defaults.neo4j_password),
    }
}

/// A unique email so concurrent test runs never collide
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

/// A movie with a random tmdbId and a title
#[allow(dead_code)]
pub fn create_test_movie(title: &str) -> Movie {
    let mut properties = serde_json::Map::new();
    properties.insert("title".to_string(), json!(title));
    Movie {
        tmdb_id: format!("test-{}", Uuid::new_v4().simple()),
        properties,
    }
}

/// Query that creates `movie` as a Movie node
pub fn create_movie_query(movie: &Movie) -> Query {
    let title = movie
        .properties
        .get("title")
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string();
    Query::new("CREATE (:Movie {tmdbId: $tmdbId, title: $title})".to_string())
        .param("tmdbId", movie.tmdb_id.clone())
        .param("title", title)
}
