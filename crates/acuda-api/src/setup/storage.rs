//! Storage setup and initialization

use acuda_core::Config;
use acuda_storage::{FileStore, LocalFileStore};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Open the root under which every user folder lives, creating it when missing.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn FileStore>> {
    let store = LocalFileStore::new(config.storage_root())
        .await
        .context("Failed to initialize document storage")?;

    tracing::info!(
        root = %store.base_path().display(),
        "Document storage initialized"
    );

    Ok(Arc::new(store))
}
