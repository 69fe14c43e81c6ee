use crate::config::types::{CrawlConfig, HttpSettings, JobSettings, Settings, StorageSettings};
use crate::{ConfigError, DeadlinkError};
use url::Url;

/// Validates the service settings
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_storage_settings(&settings.storage)?;
    validate_http_settings(&settings.http)?;
    validate_job_settings(&settings.jobs)?;
    Ok(())
}

fn validate_storage_settings(settings: &StorageSettings) -> Result<(), ConfigError> {
    if settings.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_http_settings(settings: &HttpSettings) -> Result<(), ConfigError> {
    if settings.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if settings.max_redirects > 100 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= 100, got {}",
            settings.max_redirects
        )));
    }

    Ok(())
}

fn validate_job_settings(settings: &JobSettings) -> Result<(), ConfigError> {
    if settings.stats_flush_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "stats-flush-interval must be >= 1, got {}",
            settings.stats_flush_interval
        )));
    }

    if settings.list_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "list-limit must be >= 1, got {}",
            settings.list_limit
        )));
    }

    Ok(())
}

/// Extracts and parses the seed URL, the one field a crawl cannot run without
pub fn require_start_url(config: &CrawlConfig) -> Result<Url, DeadlinkError> {
    let raw = config
        .start_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(DeadlinkError::MissingStartUrl)?;

    let url = Url::parse(raw).map_err(|e| DeadlinkError::InvalidStartUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(DeadlinkError::InvalidStartUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.host_str().is_none() {
        return Err(DeadlinkError::InvalidStartUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}
