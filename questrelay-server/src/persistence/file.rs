use super::store::CacheStore;
use super::types::{Result, SCHEMA_VERSION, SchemaMarker, StoreError};
use crate::core::{CacheEntry, Clock, SystemClock};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const SCHEMA_FILE: &str = "schema.json";

/// Cache store keeping one JSON document per key under a data directory.
///
/// Writes go to a uniquely named temp file that is then renamed over the
/// entry, so a reader sees either the old or the new document, never a mix.
#[derive(Clone)]
pub struct FileCacheStore {
    directory: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileCacheStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_clock(directory, Arc::new(SystemClock))
    }

    pub fn with_clock(directory: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory: directory.into(),
            clock,
        }
    }

    /// Data directory this store reads and writes
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.directory.join(format!("{}.json", key)))
    }

    async fn ensure_directory(&self) -> Result<()> {
        if tokio::fs::try_exists(&self.directory).await? {
            Ok(())
        } else {
            Err(StoreError::NotProvisioned(self.directory.clone()))
        }
    }

    /// Read the schema marker, if the directory has one
    pub async fn schema(&self) -> Result<Option<SchemaMarker>> {
        let path = self.directory.join(SCHEMA_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let path = self.entry_path(key)?;
        self.ensure_directory().await?;

        debug!("GET cache key={} path={:?}", key, path);

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = serde_json::from_str(&contents)?;
        Ok(Some(entry))
    }

    async fn upsert(&self, key: &str, data: Vec<Value>) -> Result<CacheEntry> {
        let path = self.entry_path(key)?;
        self.ensure_directory().await?;

        let entry = CacheEntry::new(key, data, self.clock.now());
        let contents = serde_json::to_vec_pretty(&entry)?;

        let tmp_path = self
            .directory
            .join(format!(".{}.{}.tmp", key, uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp_path, &contents).await?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(
            "UPSERT cache key={}, records={}, bytes={}",
            key,
            entry.data.len(),
            contents.len()
        );

        Ok(entry)
    }

    async fn provision(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory).await?;

        match self.schema().await? {
            Some(marker) if marker.version == SCHEMA_VERSION => {
                debug!("Schema v{} already present at {:?}", marker.version, self.directory);
            }
            Some(marker) => {
                return Err(StoreError::SchemaMismatch {
                    expected: SCHEMA_VERSION,
                    found: marker.version,
                });
            }
            None => {
                let contents = serde_json::to_vec_pretty(&SchemaMarker::default())?;
                tokio::fs::write(self.directory.join(SCHEMA_FILE), contents).await?;
                info!("Provisioned cache store schema v{} at {:?}", SCHEMA_VERSION, self.directory);
            }
        }

        Ok(())
    }
}
