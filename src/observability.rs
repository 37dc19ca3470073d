//! Request counters and startup/update announcements

use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::sections::{SectionKind, SectionMapping};

/// Installs the global fmt subscriber. `RUST_LOG` wins over the default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    feeds_served: AtomicU64,
    sections_not_found: AtomicU64,
    upstream_failures: AtomicU64,
    section_updates: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_served(&self) {
        self.feeds_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "feeds_served", "Metric incremented");
    }

    pub fn section_not_found(&self) {
        self.sections_not_found.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "sections_not_found", "Metric incremented");
    }

    pub fn upstream_failed(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "upstream_failures", "Metric incremented");
    }

    pub fn sections_updated(&self) {
        self.section_updates.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "section_updates", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            feeds_served: self.feeds_served.load(Ordering::Relaxed),
            sections_not_found: self.sections_not_found.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            section_updates: self.section_updates.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub feeds_served: u64,
    pub sections_not_found: u64,
    pub upstream_failures: u64,
    pub section_updates: u64,
}

/// One line per reachable feed, e.g. `http://localhost:3001/api/recent/shows?count=5`.
pub fn endpoint_lines(address: SocketAddr, mapping: &SectionMapping, count: u32) -> Vec<String> {
    let host = if address.ip().is_unspecified() {
        format!("localhost:{}", address.port())
    } else {
        address.to_string()
    };

    mapping
        .iter()
        .map(|section| format!("http://{host}/api/recent/{}?count={count}", section.label))
        .collect()
}

/// Logs the active mapping and the feed URL for each section.
pub fn announce_sections(address: SocketAddr, mapping: &SectionMapping, count: u32) {
    info!(sections = mapping.len(), "Active section mapping");
    for (section, url) in mapping.iter().zip(endpoint_lines(address, mapping, count)) {
        let kind = match section.kind() {
            SectionKind::Movie => "movie",
            SectionKind::Show => "show",
        };
        info!(
            label = %section.label,
            section_id = section.section_id,
            kind,
            %url,
            "Feed available"
        );
    }
}
