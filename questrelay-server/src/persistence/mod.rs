//! Cache store backends for the quest payload.

pub mod file;
pub mod memory;
pub mod store;
pub mod types;

pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;
pub use store::CacheStore;
pub use types::{SCHEMA_VERSION, SchemaMarker, StoreBackend, StoreError};
