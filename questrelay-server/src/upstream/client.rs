//! HTTP client for the Discord quests endpoint

use super::QuestSource;
use super::error::UpstreamError;
use super::headers::build_headers;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Default Discord API base URL
pub const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10";

const QUESTS_PATH: &str = "quests/@me";

#[derive(Debug, Deserialize)]
struct QuestsResponse {
    #[serde(default)]
    quests: Option<Vec<Value>>,
}

/// Quest source backed by the Discord REST API.
/// Clone is cheap, the inner reqwest client is reference counted.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http_client: Client,
    quests_url: Url,
}

impl DiscordClient {
    /// Create a client against `base_url`. No request timeout unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        let quests_url = format!("{}/{}", base_url.trim_end_matches('/'), QUESTS_PATH);
        let quests_url =
            Url::parse(&quests_url).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            quests_url,
        })
    }

    /// Full URL of the quests endpoint
    pub fn quests_url(&self) -> &Url {
        &self.quests_url
    }
}

#[async_trait]
impl QuestSource for DiscordClient {
    async fn fetch_quests(&self, token: &str) -> Result<Vec<Value>, UpstreamError> {
        let headers = build_headers(token)?;

        info!("Fetching quests from {}", self.quests_url);

        let response = self
            .http_client
            .get(self.quests_url.clone())
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UpstreamError::from_status(status, &body));
        }

        let body = response.bytes().await?;
        let parsed: QuestsResponse = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

        let quests = parsed.quests.unwrap_or_default();
        debug!("Upstream returned {} quest(s)", quests.len());

        Ok(quests)
    }
}
