//! Sitemap link validator
//!
//! This crate checks that every page listed in a site's sitemap, and every
//! link found on those pages, resolves successfully. Work is split across a
//! fixed pool of workers and the aggregated result decides the process exit
//! status, which makes it suitable as a CI gate around deployments.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for run-level failures
///
/// Individual broken links are never reported through this type; they are
/// collected as [`crawler::UrlError`] values and surface in the run report.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to parse sitemap {url}: {source}")]
    Sitemap {
        url: String,
        source: crawler::SitemapError,
    },

    #[error("Sitemap {url} returned HTTP {status}")]
    SitemapStatus { url: String, status: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker {index} failed: {message}")]
    Worker { index: usize, message: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while performing a single HTTP request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed after {attempts} attempts: {source}")]
    Transient {
        url: String,
        attempts: u32,
        source: reqwest::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Permanent { url: String, source: reqwest::Error },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for HTTP fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, RunReport, UrlError, WorkerResult};
pub use crate::url::{is_url_ignored, normalize_url};
