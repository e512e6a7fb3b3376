use crate::config::status::StatusMatcher;
use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Upper bound on the worker pool size
pub const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_url(&config.site_url)?;
    validate_workers(config.workers)?;
    StatusMatcher::new(&config.success_status_codes)?;
    validate_ignore_patterns(&config.ignore_urls)?;
    Ok(())
}

/// Validates the site base URL
fn validate_site_url(site_url: &str) -> Result<(), ConfigError> {
    if site_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "siteUrl is required (config file or --site-url)".to_string(),
        ));
    }

    let url = Url::parse(site_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid siteUrl '{}': {}", site_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "siteUrl '{}' must use HTTP or HTTPS",
            site_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "siteUrl '{}' has no host",
            site_url
        )));
    }

    Ok(())
}

/// Validates the worker count
fn validate_workers(workers: usize) -> Result<(), ConfigError> {
    if !(1..=MAX_WORKERS).contains(&workers) {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, workers
        )));
    }

    Ok(())
}

/// Validates ignore patterns
fn validate_ignore_patterns(patterns: &[String]) -> Result<(), ConfigError> {
    if patterns.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::InvalidPattern(
            "Ignore pattern cannot be empty".to_string(),
        ));
    }

    Ok(())
}
