use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Largest accepted admin request body
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}

fn default_max_payload_bytes() -> usize {
    64 * 1024
}

/// Tautulli API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Full API endpoint, e.g. `http://tautulli:8181/api/v2`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Loaded from environment, not from config file
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Items requested when the client gives no usable `count`
    #[serde(default = "default_count")]
    pub default_count: u32,
    /// Upper clamp for client supplied `count`
    #[serde(default = "default_max_count")]
    pub max_count: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            default_count: default_count(),
            max_count: default_max_count(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8181/api/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_count() -> u32 {
    5
}

fn default_max_count() -> u32 {
    100
}

fn default_user_agent() -> String {
    concat!("tautulli-relay/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Where the section mapping is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    #[default]
    Local,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    /// Root directory for the local provider
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Object key of the mapping document
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data")
}

fn default_storage_key() -> String {
    "sections.json".to_string()
}
