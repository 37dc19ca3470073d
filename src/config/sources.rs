use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "RELAY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/tautulli-relay.toml";
const ENV_PREFIX: &str = "RELAY";
const ENV_SEPARATOR: &str = "__";

const API_KEY_VAR: &str = "TAUTULLI_API_KEY";
const BASE_URL_VAR: &str = "TAUTULLI_BASE_URL";
const PORT_VAR: &str = "TAUTULLI_API_PORT";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;

    apply_deployment_env(&mut config, |name| env::var(name).ok())?;

    Ok(config)
}

/// Applies the plain `TAUTULLI_*` variables the service has always been
/// deployed with. The API key is only ever read from here.
pub(crate) fn apply_deployment_env<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_key) = lookup(API_KEY_VAR).filter(|v| !v.is_empty()) {
        config.upstream.api_key = Some(api_key);
    }

    if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.is_empty()) {
        config.upstream.base_url = base_url;
    }

    if let Some(port) = lookup(PORT_VAR).filter(|v| !v.is_empty()) {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("{PORT_VAR} is not a valid port: {port}")))?;
        config.server.bind_addr.set_port(port);
    }

    Ok(())
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // RELAY__UPSTREAM__BASE_URL -> upstream.base_url
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn env_of(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:3001");
        assert_eq!(config.upstream.default_count, 5);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"
max_payload_bytes = 1024

[upstream]
base_url = "http://tautulli.lan:8181/api/v2"
timeout_secs = 4
max_count = 25

[storage]
provider = "memory"
key = "relay/sections.json"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.max_payload_bytes, 1024);
        assert_eq!(config.upstream.base_url, "http://tautulli.lan:8181/api/v2");
        assert_eq!(config.upstream.timeout_secs, 4);
        assert_eq!(config.upstream.max_count, 25);
        assert_eq!(config.upstream.default_count, 5);
        assert_eq!(config.storage.key, "relay/sections.json");
    }

    #[test]
    fn test_api_key_in_toml_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[upstream]\napi_key = \"leaked\"\n").unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert!(config.upstream.api_key.is_none());
    }

    #[test]
    fn test_deployment_env() {
        let mut config = Config::default();
        let vars = env_of(&[
            ("TAUTULLI_API_KEY", "abc123"),
            ("TAUTULLI_BASE_URL", "http://media:8181/api/v2"),
            ("TAUTULLI_API_PORT", "8099"),
        ]);

        apply_deployment_env(&mut config, |name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.upstream.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.upstream.base_url, "http://media:8181/api/v2");
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8099");
    }

    #[test]
    fn test_deployment_env_rejects_bad_port() {
        let mut config = Config::default();
        let vars = env_of(&[("TAUTULLI_API_PORT", "http")]);

        assert!(apply_deployment_env(&mut config, |name| vars.get(name).cloned()).is_err());
    }

    #[test]
    fn test_empty_deployment_env_is_ignored() {
        let mut config = Config::default();
        let vars = env_of(&[("TAUTULLI_API_KEY", ""), ("TAUTULLI_BASE_URL", "")]);

        apply_deployment_env(&mut config, |name| vars.get(name).cloned()).unwrap();

        assert!(config.upstream.api_key.is_none());
        assert_eq!(config.upstream.base_url, "http://localhost:8181/api/v2");
    }
}
