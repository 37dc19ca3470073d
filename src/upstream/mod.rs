//! Client for the Tautulli `get_recently_added` command
//!
//! [`UpstreamClient`] is the seam the dispatcher talks to; [`TautulliClient`]
//! is the reqwest implementation used in production.

mod http;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::{HttpConfig, TautulliClient};

/// Tautulli command name for recently added media.
pub const RECENTLY_ADDED_CMD: &str = "get_recently_added";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    RequestFailed(String),

    #[error("upstream returned HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream returned malformed JSON: {0}")]
    MalformedResponse(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// One recently-added query against a single section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentQuery {
    pub section_id: u64,
    pub count: u32,
}

impl RecentQuery {
    /// Query string pairs, API key first, in the order Tautulli documents them.
    pub fn params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", api_key.to_string()),
            ("cmd", RECENTLY_ADDED_CMD.to_string()),
            ("count", self.count.to_string()),
            ("section_id", self.section_id.to_string()),
        ]
    }
}

/// Anything that can answer a recently-added query with raw JSON.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn recently_added(&self, query: &RecentQuery) -> Result<Value>;
}
