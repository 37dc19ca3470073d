use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid upstream base_url '{url}', expected an http:// or https:// URL")]
    InvalidBaseUrl { url: String },

    #[error("Upstream timeout must be positive")]
    InvalidTimeout,

    #[error("max_count must be at least 1")]
    InvalidMaxCount,

    #[error("default_count ({default_count}) must be between 1 and max_count ({max_count})")]
    InvalidDefaultCount { default_count: u32, max_count: u32 },

    #[error("Storage key must not be empty")]
    EmptyStorageKey,

    #[error("max_payload_bytes must be positive")]
    InvalidPayloadLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_upstream(config)?;
    validate_storage(config)?;
    validate_server(config)?;
    Ok(())
}

fn validate_upstream(config: &Config) -> Result<(), ValidationError> {
    let upstream = &config.upstream;

    let url = upstream.base_url.trim();
    let has_host = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ValidationError::InvalidBaseUrl {
            url: upstream.base_url.clone(),
        });
    }

    if upstream.timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout);
    }

    if upstream.max_count == 0 {
        return Err(ValidationError::InvalidMaxCount);
    }

    if upstream.default_count == 0 || upstream.default_count > upstream.max_count {
        return Err(ValidationError::InvalidDefaultCount {
            default_count: upstream.default_count,
            max_count: upstream.max_count,
        });
    }

    Ok(())
}

fn validate_storage(config: &Config) -> Result<(), ValidationError> {
    if config.storage.key.trim().is_empty() {
        return Err(ValidationError::EmptyStorageKey);
    }
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_payload_bytes == 0 {
        return Err(ValidationError::InvalidPayloadLimit);
    }
    Ok(())
}
