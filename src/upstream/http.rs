//! reqwest-backed Tautulli client

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{RecentQuery, Result, UpstreamClient, UpstreamError};
use crate::config::UpstreamConfig;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("tautulli-relay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl From<&UpstreamConfig> for HttpConfig {
    fn from(config: &UpstreamConfig) -> Self {
        let request_timeout = Duration::from_secs(config.timeout_secs);
        Self {
            connect_timeout: request_timeout.min(HttpConfig::default().connect_timeout),
            request_timeout,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Calls `GET <base_url>?apikey=..&cmd=get_recently_added&count=..&section_id=..`
pub struct TautulliClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl TautulliClient {
    pub fn new(config: HttpConfig, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| UpstreamError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| UpstreamError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        Self::new(
            HttpConfig::from(config),
            &config.base_url,
            config.api_key.clone().unwrap_or_default(),
        )
    }
}

fn classify(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::RequestFailed(err.to_string())
    }
}

#[async_trait]
impl UpstreamClient for TautulliClient {
    async fn recently_added(&self, query: &RecentQuery) -> Result<Value> {
        debug!(section_id = query.section_id, count = query.count, "Querying Tautulli");

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&query.params(&self.api_key))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await.map_err(classify)?;
        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

        debug!(section_id = query.section_id, size = body.len(), "Tautulli responded");
        Ok(payload)
    }
}
