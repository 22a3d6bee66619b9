use super::types::Result;
use crate::core::CacheEntry;
use async_trait::async_trait;
use serde_json::Value;

/// Key/value persistence for cached quest payloads.
///
/// `get` must report backend failures as errors rather than as a missing
/// entry. `upsert` replaces `data` and `updated_at` together; concurrent
/// upserts on the same key resolve last-writer-wins.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Fetch the entry stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Create or replace the entry under `key`, stamping it with the current time
    async fn upsert(&self, key: &str, data: Vec<Value>) -> Result<CacheEntry>;

    /// Make sure the backing storage exists and has the expected layout
    async fn provision(&self) -> Result<()> {
        Ok(())
    }
}
