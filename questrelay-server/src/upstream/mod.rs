//! Upstream quest API access.
//!
//! The relay talks to Discord's `/quests/@me` endpoint with a user token,
//! impersonating the desktop web client.

pub mod client;
pub mod error;
pub mod headers;

pub use client::{DEFAULT_BASE_URL, DiscordClient};
pub use error::UpstreamError;

use async_trait::async_trait;
use serde_json::Value;

/// Source of the current quest list
#[async_trait]
pub trait QuestSource: Send + Sync + 'static {
    /// Fetch the `quests` array, or an empty list when the response has none
    async fn fetch_quests(&self, token: &str) -> Result<Vec<Value>, UpstreamError>;
}
