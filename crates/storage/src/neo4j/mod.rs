//! Neo4j graph database client for users, ratings and favorites

pub(crate) mod client;
pub mod mock;
pub(crate) mod queries;

pub use client::Neo4jClient;
pub use mock::MockNeo4jClient;
