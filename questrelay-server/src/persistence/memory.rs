use super::store::CacheStore;
use super::types::Result;
use crate::core::{CacheEntry, Clock, SystemClock};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// In-memory cache store. Entries do not survive a restart.
#[derive(Clone)]
pub struct MemoryCacheStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        debug!("GET cache key={}", key);
        Ok(self.entries.read().get(key).cloned())
    }

    async fn upsert(&self, key: &str, data: Vec<Value>) -> Result<CacheEntry> {
        debug!("UPSERT cache key={}, records={}", key, data.len());

        let entry = CacheEntry::new(key, data, self.clock.now());
        self.entries.write().insert(key.to_string(), entry.clone());

        Ok(entry)
    }
}
