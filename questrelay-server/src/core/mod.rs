pub mod clock;
pub mod error;
pub mod fetcher;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RelayError;
pub use fetcher::{DEFAULT_FRESHNESS_WINDOW_SECS, FetcherConfig, QuestFetcher};
pub use types::{CacheEntry, DEFAULT_CACHE_KEY};
