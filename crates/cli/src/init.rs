//! Service bootstrap shared by every subcommand

use anyhow::{Context, Result};
use cinegraph_core::config::Config;
use cinegraph_services::Services;
use cinegraph_storage::GraphStore;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::storage_init;

/// Everything a command needs: validated config, the store and the services over it
pub struct App {
    pub config: Config,
    pub store: Arc<dyn GraphStore>,
    pub services: Services,
}

/// Load configuration, connect to the graph store and wire the services
///
/// Configuration comes from `config_path` when given, otherwise from the
/// global config file, with environment variables applied on top.
pub async fn bootstrap(config_path: Option<&Path>) -> Result<App> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    let store = storage_init::connect_with_retry(&config.storage).await?;
    let services = Services::new(store.clone(), &config.auth);

    Ok(App {
        config,
        store,
        services,
    })
}
