use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cache key the relay stores the quest list under
pub const DEFAULT_CACHE_KEY: &str = "discord_quests";

/// Cached quest payload with the time of its last upstream refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Logical key of the entry
    pub id: String,
    /// Quest records exactly as returned upstream
    pub data: Vec<Value>,
    /// When the data was last refreshed from upstream
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create a new entry stamped at `now`
    pub fn new(id: impl Into<String>, data: Vec<Value>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            data,
            updated_at: now,
        }
    }

    /// Age of the entry relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.updated_at)
    }

    /// Check if the entry is still inside the freshness window
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age(now) < window
    }
}
