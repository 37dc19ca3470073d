//! Generic recently-added route: label -> section -> upstream -> normalized feed

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::sections::{SectionKind, SectionRegistry};
use crate::transform::transform;
use crate::upstream::{RecentQuery, UpstreamClient, UpstreamError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("section not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Bounds applied to the client supplied `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountPolicy {
    pub default_count: u32,
    pub max_count: u32,
}

impl Default for CountPolicy {
    fn default() -> Self {
        Self {
            default_count: 5,
            max_count: 100,
        }
    }
}

impl From<&UpstreamConfig> for CountPolicy {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            default_count: config.default_count,
            max_count: config.max_count,
        }
    }
}

impl CountPolicy {
    /// Missing, blank or non-numeric counts fall back to the default;
    /// numeric ones are clamped into `1..=max_count`.
    pub fn resolve(&self, raw: Option<&str>) -> u32 {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return self.default_count;
        };

        match raw.parse::<i64>() {
            Ok(n) => n.clamp(1, i64::from(self.max_count.max(1))) as u32,
            Err(_) => {
                debug!(count = raw, "Ignoring non-numeric count");
                self.default_count
            }
        }
    }
}

/// Serves any configured section through one code path.
#[derive(Clone)]
pub struct RouteDispatcher {
    registry: Arc<SectionRegistry>,
    upstream: Arc<dyn UpstreamClient>,
    counts: CountPolicy,
}

impl RouteDispatcher {
    pub fn new(
        registry: Arc<SectionRegistry>,
        upstream: Arc<dyn UpstreamClient>,
        counts: CountPolicy,
    ) -> Self {
        Self {
            registry,
            upstream,
            counts,
        }
    }

    /// Looks up `label` without touching the upstream.
    pub fn resolve(&self, label: &str) -> Result<u64, DispatchError> {
        self.registry
            .resolve(label)
            .ok_or_else(|| DispatchError::NotFound(label.to_string()))
    }

    /// Fetches and normalizes the recently added feed for `label`.
    pub async fn recent(&self, label: &str, count: Option<&str>) -> Result<Value, DispatchError> {
        self.recent_at(label, count, chrono::Utc::now().timestamp())
            .await
    }

    /// Same as [`recent`](Self::recent) with an explicit clock for relative times.
    pub async fn recent_at(
        &self,
        label: &str,
        count: Option<&str>,
        now: i64,
    ) -> Result<Value, DispatchError> {
        let count = self.counts.resolve(count);
        let section_id = self.resolve(label)?;

        let query = RecentQuery { section_id, count };
        let raw = self.upstream.recently_added(&query).await.map_err(|e| {
            warn!(label, section_id, error = %e, "Upstream request failed");
            e
        })?;

        let style = SectionKind::from_label(label).title_style();
        debug!(label, section_id, count, ?style, "Normalizing upstream payload");

        Ok(transform(&raw, style, now))
    }
}
