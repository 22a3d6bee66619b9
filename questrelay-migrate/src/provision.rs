//! Schema provisioning for the file cache store

use anyhow::Result;
use questrelay_server::{CacheStore, FileCacheStore};
use std::path::Path;
use tracing::info;

/// Create the data directory and schema marker; safe to run repeatedly
pub async fn provision_store(data_dir: &Path) -> Result<()> {
    info!("Provisioning {:?}", data_dir);

    let store = FileCacheStore::new(data_dir);
    store.provision().await?;

    Ok(())
}
