use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Current on-disk schema version of the file store
pub const SCHEMA_VERSION: u32 = 1;

/// Persistence error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),

    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: u32, found: u32 },

    #[error("Store not provisioned: {0:?}")]
    NotProvisioned(PathBuf),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Marker file describing the layout of a provisioned data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaMarker {
    pub version: u32,
}

impl Default for SchemaMarker {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
        }
    }
}

/// Which backend holds the cache entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local, lost on restart
    Memory,
    /// JSON documents under a data directory
    #[default]
    File,
}
