pub mod app;
pub mod config;
pub mod core;
pub mod persistence;
pub mod server;
pub mod upstream;

// Re-export commonly used types
pub use config::ServerConfig;
pub use core::{
    CacheEntry, Clock, FetcherConfig, ManualClock, QuestFetcher, RelayError, SystemClock,
};
pub use persistence::{CacheStore, FileCacheStore, MemoryCacheStore, StoreBackend, StoreError};
pub use server::{AppState, create_router};
pub use upstream::{DiscordClient, QuestSource, UpstreamError};
