//! Wiring from configuration to a ready-to-serve application state

use crate::config::ServerConfig;
use crate::core::error::Result;
use crate::core::{Clock, QuestFetcher, SystemClock};
use crate::persistence::{CacheStore, FileCacheStore, MemoryCacheStore, StoreBackend};
use crate::server::AppState;
use crate::upstream::DiscordClient;
use std::sync::Arc;
use tracing::info;

/// Build the configured cache store
pub fn build_store(config: &ServerConfig, clock: Arc<dyn Clock>) -> Arc<dyn CacheStore> {
    match config.cache.backend {
        StoreBackend::Memory => {
            info!("Using in-memory cache store");
            Arc::new(MemoryCacheStore::with_clock(clock))
        }
        StoreBackend::File => {
            info!("Using file cache store at {:?}", config.cache.data_dir);
            Arc::new(FileCacheStore::with_clock(&config.cache.data_dir, clock))
        }
    }
}

/// Build the application state around an existing store
pub fn build_state(
    config: &ServerConfig,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
) -> Result<AppState> {
    let fetcher_config = config.to_fetcher_config()?;
    let client = DiscordClient::new(&config.upstream.base_url, config.upstream_timeout())?;
    let fetcher = QuestFetcher::new(fetcher_config, store, Arc::new(client), clock);

    Ok(AppState::new(Arc::new(fetcher)))
}

/// Build store and state on the wall clock
pub fn build_default(config: &ServerConfig) -> Result<(Arc<dyn CacheStore>, AppState)> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = build_store(config, clock.clone());
    let state = build_state(config, store.clone(), clock)?;
    Ok((store, state))
}
