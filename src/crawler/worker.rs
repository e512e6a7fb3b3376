//! Per-shard crawl worker
//!
//! A worker walks its shard in order. Each shard page is fetched, its
//! anchors are extracted, and every link is existence-checked without being
//! expanded further, so the crawl never goes deeper than one hop past a
//! sitemap entry.
//!
//! A link to one of the worker's own shard pages that has not had its turn
//! yet is skipped; that page is checked and expanded on its own turn, so a
//! failure there is reported with the page itself as origin.
//!
//! Requests inside a worker are strictly sequential. Parallelism comes from
//! running several workers side by side.

use crate::config::{Config, StatusMatcher};
use crate::crawler::log_sink::{LogEvent, LogSink};
use crate::crawler::parser::extract_links;
use crate::crawler::report::{UrlError, WorkerResult};
use crate::crawler::RequestClient;
use crate::url::{is_url_ignored, normalize_url, resolve_link};
use crate::ConfigError;
use reqwest::Response;
use std::collections::HashSet;
use url::Url;

/// Key used for the visited and pending sets
pub(crate) fn visit_key(url: &str) -> String {
    normalize_url(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.trim().to_string())
}

/// State owned by a single worker for the duration of its shard
pub struct CrawlWorker {
    index: usize,
    pages: Vec<String>,
    config: Config,
    base_url: Url,
    client: RequestClient,
    status: StatusMatcher,
    log: LogSink,

    /// URLs already requested, plus every page owned by another shard
    visited: HashSet<String>,

    /// This shard's pages that have not had their turn yet
    pending: HashSet<String>,

    errors: Vec<UrlError>,
    passed: usize,
}

impl CrawlWorker {
    /// Creates a worker for one shard
    ///
    /// # Arguments
    ///
    /// * `pages` - The shard, crawled in order
    /// * `other_pages` - Pages of every other shard; never requested here
    /// * `config` - This worker's own copy of the configuration
    /// * `base_url` - Site base URL for resolving relative links
    /// * `client` - Shared-pool HTTP client
    /// * `log` - Progress sink for this worker
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError)` - `successStatusCodes` could not be parsed
    pub fn new(
        pages: Vec<String>,
        other_pages: Vec<String>,
        config: Config,
        base_url: Url,
        client: RequestClient,
        log: LogSink,
    ) -> Result<Self, ConfigError> {
        let status = StatusMatcher::new(&config.success_status_codes)?;
        let visited = other_pages.iter().map(|p| visit_key(p)).collect();
        let pending = pages.iter().map(|p| visit_key(p)).collect();

        Ok(Self {
            index: log.worker(),
            pages,
            config,
            base_url,
            client,
            status,
            log,
            visited,
            pending,
            errors: Vec::new(),
            passed: 0,
        })
    }

    /// Crawls the whole shard and returns the collected result
    ///
    /// Consumes the worker; its log sink is dropped on return.
    pub async fn run(mut self) -> WorkerResult {
        let pages = std::mem::take(&mut self.pages);
        let total = pages.len();
        self.log.send(LogEvent::Started { pages: total });

        for (position, page) in pages.iter().enumerate() {
            self.pending.remove(&visit_key(page));
            self.log.send(LogEvent::Checking {
                position: position + 1,
                total,
                url: page.clone(),
            });
            self.validate(page, page, true).await;
        }

        self.log.send(LogEvent::Done {
            passed: self.passed,
            failed: self.errors.len(),
        });

        WorkerResult {
            errors: self.errors,
            passed: self.passed,
        }
    }

    /// Validates `url`, found on `origin`, expanding its links if `expand`
    ///
    /// Links discovered on an expanded page are validated with
    /// `expand = false`, which bounds the traversal at one hop.
    pub async fn validate(&mut self, origin: &str, url: &str, expand: bool) {
        let Some(response) = self.check(origin, url, expand).await else {
            return;
        };

        if !expand {
            return;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                self.record(origin, url, None, Some(format!("Failed to read body: {}", e)));
                return;
            }
        };

        for href in extract_links(&body) {
            match resolve_link(&href, &self.base_url) {
                Some(link) => {
                    self.check(origin, link.as_str(), false).await;
                }
                None => {
                    tracing::trace!(worker = self.index, "Skipping link {:?} on {}", href, origin);
                }
            }
        }
    }

    /// Requests a single URL and records the outcome
    ///
    /// Returns the response only when it passed.
    async fn check(&mut self, origin: &str, url: &str, expand: bool) -> Option<Response> {
        let target = match normalize_url(url) {
            Ok(target) => target.to_string(),
            Err(e) => {
                let raw = url.trim().to_string();
                if self.visited.insert(raw.clone()) {
                    self.record(origin, &raw, None, Some(format!("Invalid URL: {}", e)));
                }
                return None;
            }
        };

        if self.visited.contains(&target)
            || (!expand && self.pending.contains(&target))
            || is_url_ignored(&target, &self.config.ignore_urls)
        {
            return None;
        }

        self.visited.insert(target.clone());
        self.log.send(LogEvent::Validating {
            url: target.clone(),
        });

        let response = match self.client.fetch(&target).await {
            Ok(response) => response,
            Err(e) => {
                let reason = e.to_string();
                self.log.send(LogEvent::Exception {
                    url: target.clone(),
                    reason: reason.clone(),
                });
                self.record(origin, &target, None, Some(reason));
                return None;
            }
        };

        let status = response.status();
        if !self.status.is_success(status.as_u16()) {
            self.record(
                origin,
                &target,
                Some(status.as_u16()),
                status.canonical_reason().map(str::to_string),
            );
            return None;
        }

        self.passed += 1;
        Some(response)
    }

    fn record(&mut self, page: &str, url: &str, status: Option<u16>, reason: Option<String>) {
        self.errors.push(UrlError {
            page: page.to_string(),
            url: url.to_string(),
            status,
            reason,
        });
    }
}
