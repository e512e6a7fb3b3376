//! Crawler module for sitemap resolution and link validation
//!
//! This module contains the core validation logic, including:
//! - HTTP fetching with retry logic
//! - Sitemap resolution
//! - Static partitioning of pages across workers
//! - HTML link extraction
//! - Per-shard crawl workers and their progress logging
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod log_sink;
mod parser;
mod partition;
mod report;
mod sitemap;
mod worker;

pub use coordinator::{Coordinator, SITEMAP_PATH};
pub use fetcher::{
    build_http_client, is_transient, Exhausted, RequestClient, RetryPolicy, BROWSER_USER_AGENT,
    MAX_REDIRECTS,
};
pub use log_sink::{log_channel, spawn_logger, LogEvent, LogRecord, LogSink};
pub use parser::extract_links;
pub use partition::{other_pages, partition};
pub use report::{RunReport, UrlError, WorkerResult, DEFAULT_ERROR_STATUS};
pub use sitemap::{parse_sitemap, resolve_sitemap, SitemapError, SitemapNode};
pub use worker::CrawlWorker;

use crate::config::Config;
use crate::Result;

/// Validates a whole site
///
/// Convenience wrapper that builds a [`Coordinator`] and runs it.
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(RunReport)` - The run completed; check `exit_code()` for the verdict
/// * `Err(ValidatorError)` - The run could not complete
pub async fn validate_site(config: Config) -> Result<RunReport> {
    Coordinator::new(config)?.run().await
}
