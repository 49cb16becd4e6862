use crate::{GraphStore, MockNeo4jClient, Neo4jClient};
use cinegraph_core::{config::StorageConfig, Error};
use std::sync::Arc;
use tracing::info;

/// Creates a graph store client based on configuration.
///
/// Returns a trait object so services can run against Neo4j or the in-memory
/// mock interchangeably.
///
/// # Errors
/// Returns an error if the provider is unknown or Neo4j cannot be reached
///
/// # Example
/// ```ignore
/// let config = StorageConfig::default();
/// let store = create_graph_store(&config).await?;
/// ```
pub async fn create_graph_store(config: &StorageConfig) -> Result<Arc<dyn GraphStore>, Error> {
    match config.provider.as_str() {
        "neo4j" => {
            let client = Neo4jClient::new(config).await?;
            Ok(Arc::new(client) as Arc<dyn GraphStore>)
        }
        "mock" => {
            info!("Using in-memory mock graph store");
            Ok(Arc::new(MockNeo4jClient::new()) as Arc<dyn GraphStore>)
        }
        other => Err(Error::config(format!(
            "Unknown storage provider '{other}'"
        ))),
    }
}

/// Creates a graph store and ensures its schema constraints exist.
///
/// Equivalent to calling `create_graph_store()` followed by `initialize()`.
pub async fn create_and_initialize_graph_store(
    config: &StorageConfig,
) -> Result<Arc<dyn GraphStore>, Error> {
    let store = create_graph_store(config).await?;
    store.initialize().await?;
    Ok(store)
}
