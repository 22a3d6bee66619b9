use super::clock::Clock;
use super::error::{RelayError, Result};
use super::types::DEFAULT_CACHE_KEY;
use crate::persistence::CacheStore;
use crate::upstream::QuestSource;
use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Default freshness window for the cached quest list
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 30 * 60;

/// Settings the fetcher is constructed with
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Upstream credential; requests fail fast when absent or blank
    pub token: Option<String>,
    /// How long a cached entry is served without asking upstream
    pub freshness_window: Duration,
    /// Key of the cache entry
    pub cache_key: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            token: None,
            freshness_window: Duration::seconds(DEFAULT_FRESHNESS_WINDOW_SECS as i64),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
        }
    }
}

/// Read-through cache in front of the upstream quest API.
///
/// Fresh entries are served from the store. Missing or stale entries are
/// refreshed from upstream and written back. Concurrent stale requests are
/// not collapsed: each may call upstream and upsert, and the last write wins.
pub struct QuestFetcher {
    config: FetcherConfig,
    store: Arc<dyn CacheStore>,
    source: Arc<dyn QuestSource>,
    clock: Arc<dyn Clock>,
}

impl QuestFetcher {
    pub fn new(
        config: FetcherConfig,
        store: Arc<dyn CacheStore>,
        source: Arc<dyn QuestSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            "Initializing quest fetcher with key={}, freshness_window={}s",
            config.cache_key,
            config.freshness_window.num_seconds()
        );

        Self {
            config,
            store,
            source,
            clock,
        }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Return the quest list, refreshing it from upstream when the cache is stale
    pub async fn get_quests(&self) -> Result<Vec<Value>> {
        let token = self
            .config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RelayError::Config("Discord token not configured on server".into()))?;

        let key = &self.config.cache_key;

        match self.store.get(key).await? {
            Some(entry) => {
                let now = self.clock.now();
                let age = entry.age(now);
                if entry.is_fresh(now, self.config.freshness_window) {
                    debug!("Cache hit for {} (age={}s)", key, age.num_seconds());
                    return Ok(entry.data);
                }
                debug!("Cache stale for {} (age={}s)", key, age.num_seconds());
            }
            None => debug!("Cache miss for {}", key),
        }

        let quests = self.source.fetch_quests(token).await?;
        let entry = self.store.upsert(key, quests).await?;

        info!(
            "Cache updated for {} with {} quest(s)",
            key,
            entry.data.len()
        );

        Ok(entry.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CacheEntry, ManualClock};
    use crate::persistence::{MemoryCacheStore, StoreError};
    use crate::upstream::UpstreamError;
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Upstream fake returning a scripted response and counting calls
    struct ScriptedSource {
        calls: AtomicUsize,
        response: Mutex<std::result::Result<Vec<Value>, String>>,
        tokens: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn returning(quests: Vec<Value>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response: Mutex::new(Ok(quests)),
                tokens: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            let source = Self::returning(vec![]);
            *source.response.lock() = Err("connection reset".into());
            source
        }

        fn set_response(&self, quests: Vec<Value>) {
            *self.response.lock() = Ok(quests);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuestSource for ScriptedSource {
        async fn fetch_quests(
            &self,
            token: &str,
        ) -> std::result::Result<Vec<Value>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tokens.lock().push(token.to_string());
            let response = self.response.lock().clone();
            response.map_err(|msg| {
                UpstreamError::from_status(reqwest::StatusCode::SERVICE_UNAVAILABLE, &msg)
            })
        }
    }

    /// Store wrapper counting reads, optionally failing every call
    struct ProbeStore {
        inner: MemoryCacheStore,
        reads: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CacheStore for ProbeStore {
        async fn get(&self, key: &str) -> crate::persistence::types::Result<Option<CacheEntry>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::IOError(std::io::Error::other("disk gone")));
            }
            self.inner.get(key).await
        }

        async fn upsert(
            &self,
            key: &str,
            data: Vec<Value>,
        ) -> crate::persistence::types::Result<CacheEntry> {
            if self.fail {
                return Err(StoreError::IOError(std::io::Error::other("disk gone")));
            }
            self.inner.upsert(key, data).await
        }
    }

    struct Harness {
        fetcher: QuestFetcher,
        source: Arc<ScriptedSource>,
        store: MemoryCacheStore,
        clock: ManualClock,
    }

    fn harness(source: Arc<ScriptedSource>) -> Harness {
        let clock = ManualClock::new(Utc::now());
        let store = MemoryCacheStore::with_clock(Arc::new(clock.clone()));
        let config = FetcherConfig {
            token: Some("secret".into()),
            ..FetcherConfig::default()
        };
        let fetcher = QuestFetcher::new(
            config,
            Arc::new(store.clone()),
            source.clone(),
            Arc::new(clock.clone()),
        );
        Harness {
            fetcher,
            source,
            store,
            clock,
        }
    }

    #[test]
    fn test_default_config() {
        let config = FetcherConfig::default();
        assert_eq!(config.freshness_window, Duration::minutes(30));
        assert_eq!(config.cache_key, "discord_quests");
        assert!(config.token.is_none());
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_and_stores() {
        let h = harness(ScriptedSource::returning(vec![json!({"id": 1})]));

        let quests = h.fetcher.get_quests().await.unwrap();

        assert_eq!(quests, vec![json!({"id": 1})]);
        assert_eq!(h.source.calls(), 1);
        let entry = h.store.get("discord_quests").await.unwrap().unwrap();
        assert_eq!(entry.data, vec![json!({"id": 1})]);
        assert_eq!(entry.updated_at, h.clock.now());
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_upstream() {
        let h = harness(ScriptedSource::returning(vec![json!({"id": "upstream"})]));
        h.store
            .upsert("discord_quests", vec![json!({"id": "cached"})])
            .await
            .unwrap();
        h.clock.advance(Duration::minutes(29));

        let quests = h.fetcher.get_quests().await.unwrap();

        assert_eq!(quests, vec![json!({"id": "cached"})]);
        assert_eq!(h.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_at_exact_window_refreshes() {
        let h = harness(ScriptedSource::returning(vec![json!({"id": "new"})]));
        h.store
            .upsert("discord_quests", vec![json!({"id": "old"})])
            .await
            .unwrap();
        h.clock.advance(Duration::minutes(30));

        let quests = h.fetcher.get_quests().await.unwrap();

        assert_eq!(quests, vec![json!({"id": "new"})]);
        assert_eq!(h.source.calls(), 1);
        let entry = h.store.get("discord_quests").await.unwrap().unwrap();
        assert_eq!(entry.updated_at, h.clock.now());
    }

    #[tokio::test]
    async fn test_scenario_fetch_serve_refetch() {
        let h = harness(ScriptedSource::returning(vec![json!({"id": 1})]));
        let t0 = h.clock.now();

        assert_eq!(h.fetcher.get_quests().await.unwrap(), vec![json!({"id": 1})]);
        assert_eq!(h.source.calls(), 1);
        let entry = h.store.get("discord_quests").await.unwrap().unwrap();
        assert_eq!(entry.updated_at, t0);

        h.clock.advance(Duration::minutes(10));
        assert_eq!(h.fetcher.get_quests().await.unwrap(), vec![json!({"id": 1})]);
        assert_eq!(h.source.calls(), 1);

        h.clock.set(t0 + Duration::minutes(31));
        h.source.set_response(vec![json!({"id": 2})]);
        assert_eq!(h.fetcher.get_quests().await.unwrap(), vec![json!({"id": 2})]);
        assert_eq!(h.source.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_upstream_is_cached() {
        let h = harness(ScriptedSource::returning(vec![]));

        let quests = h.fetcher.get_quests().await.unwrap();

        assert!(quests.is_empty());
        let entry = h.store.get("discord_quests").await.unwrap().unwrap();
        assert!(entry.data.is_empty());

        // An empty list is still a valid cache entry
        h.fetcher.get_quests().await.unwrap();
        assert_eq!(h.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_does_not_fall_back_to_stale_cache() {
        let h = harness(ScriptedSource::failing());
        h.store
            .upsert("discord_quests", vec![json!({"id": "old"})])
            .await
            .unwrap();
        h.clock.advance(Duration::hours(2));

        let result = h.fetcher.get_quests().await;

        assert!(matches!(result, Err(RelayError::Upstream(_))));
        let entry = h.store.get("discord_quests").await.unwrap().unwrap();
        assert_eq!(entry.data, vec![json!({"id": "old"})]);
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        for token in [None, Some(String::new()), Some("   ".to_string())] {
            let source = ScriptedSource::returning(vec![json!(1)]);
            let store = Arc::new(ProbeStore {
                inner: MemoryCacheStore::new(),
                reads: AtomicUsize::new(0),
                fail: false,
            });
            let config = FetcherConfig {
                token,
                ..FetcherConfig::default()
            };
            let fetcher = QuestFetcher::new(
                config,
                store.clone(),
                source.clone(),
                Arc::new(ManualClock::new(Utc::now())),
            );

            let result = fetcher.get_quests().await;

            assert!(matches!(result, Err(RelayError::Config(_))));
            assert_eq!(store.reads.load(Ordering::SeqCst), 0);
            assert_eq!(source.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_token_is_trimmed_before_upstream() {
        let source = ScriptedSource::returning(vec![]);
        let config = FetcherConfig {
            token: Some("  secret\n".into()),
            ..FetcherConfig::default()
        };
        let fetcher = QuestFetcher::new(
            config,
            Arc::new(MemoryCacheStore::new()),
            source.clone(),
            Arc::new(ManualClock::new(Utc::now())),
        );

        fetcher.get_quests().await.unwrap();

        assert_eq!(source.tokens.lock().as_slice(), ["secret".to_string()]);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let source = ScriptedSource::returning(vec![json!(1)]);
        let store = Arc::new(ProbeStore {
            inner: MemoryCacheStore::new(),
            reads: AtomicUsize::new(0),
            fail: true,
        });
        let config = FetcherConfig {
            token: Some("secret".into()),
            ..FetcherConfig::default()
        };
        let fetcher = QuestFetcher::new(
            config,
            store,
            source.clone(),
            Arc::new(ManualClock::new(Utc::now())),
        );

        let result = fetcher.get_quests().await;

        assert!(matches!(result, Err(RelayError::Store(_))));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_stale_requests_all_succeed() {
        let h = harness(ScriptedSource::returning(vec![json!({"id": 7})]));
        let fetcher = Arc::new(h.fetcher);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let fetcher = fetcher.clone();
            handles.push(tokio::spawn(async move { fetcher.get_quests().await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), vec![json!({"id": 7})]);
        }

        let calls = h.source.calls();
        assert!((1..=4).contains(&calls));
        let entry = h.store.get("discord_quests").await.unwrap().unwrap();
        assert_eq!(entry.data, vec![json!({"id": 7})]);
    }
}
