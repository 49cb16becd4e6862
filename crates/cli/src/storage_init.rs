//! Graph store connection helpers for the CLI

use anyhow::{Context, Result};
use cinegraph_core::{config::StorageConfig, Error};
use cinegraph_storage::GraphStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Maximum number of connection attempts
const MAX_RETRIES: u32 = 3;

/// Delay between attempts in seconds
const RETRY_DELAY_SECS: u64 = 2;

/// Connect to the configured graph store, retrying transient failures
///
/// Configuration errors such as an unknown provider are not retried.
pub async fn connect_with_retry(config: &StorageConfig) -> Result<Arc<dyn GraphStore>> {
    let mut attempt = 0;

    loop {
        attempt += 1;

        match cinegraph_storage::create_graph_store(config).await {
            Ok(store) => {
                info!(provider = %config.provider, "Connected to graph store");
                return Ok(store);
            }
            Err(e) if attempt < MAX_RETRIES && !matches!(e, Error::Config(_)) => {
                warn!(
                    "Failed to connect to graph store (attempt {}/{}): {}",
                    attempt, MAX_RETRIES, e
                );
                info!("Retrying in {} seconds...", RETRY_DELAY_SECS);
                sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
            }
            Err(e) => {
                return Err(e).context(format!(
                    "Failed to connect to graph store at {}",
                    config.neo4j_uri()
                ))
            }
        }
    }
}

/// Create the schema constraints the store relies on
pub async fn initialize_schema(store: &dyn GraphStore) -> Result<()> {
    store
        .initialize()
        .await
        .context("Failed to create graph schema constraints")?;
    info!("Graph schema constraints are in place");
    Ok(())
}
