//! Run coordinator - sitemap resolution, worker pool, and aggregation
//!
//! This module ties a run together:
//! - Resolving the sitemap into a page list
//! - Partitioning the pages into one shard per worker
//! - Spawning the workers and the aggregating logger
//! - Joining every worker and folding the results into a [`RunReport`]

use crate::config::Config;
use crate::crawler::log_sink::{log_channel, spawn_logger};
use crate::crawler::partition::{other_pages, partition};
use crate::crawler::report::{RunReport, WorkerResult};
use crate::crawler::sitemap::resolve_sitemap;
use crate::crawler::worker::{visit_key, CrawlWorker};
use crate::crawler::{RequestClient, RetryPolicy};
use crate::{Result, ValidatorError};
use std::collections::HashSet;
use tokio::task::JoinHandle;
use url::Url;

/// Path of the root sitemap, relative to the site URL
pub const SITEMAP_PATH: &str = "/sitemap.xml";

/// Main coordinator structure
pub struct Coordinator {
    config: Config,
    client: RequestClient,
}

impl Coordinator {
    /// Creates a coordinator with the default retry policy
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ValidatorError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self> {
        let client = RequestClient::new(RetryPolicy::default())?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a coordinator around an existing request client
    pub fn with_client(config: Config, client: RequestClient) -> Self {
        Self { config, client }
    }

    /// The configuration this coordinator runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// URL of the root sitemap
    pub fn sitemap_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.config.site_url)?.join(SITEMAP_PATH)?)
    }

    /// Resolves the sitemap tree into a de-duplicated page list
    ///
    /// Order is preserved; a page listed twice keeps its first position.
    pub async fn resolve_pages(&self) -> Result<Vec<String>> {
        let sitemap_url = self.sitemap_url()?;
        tracing::info!("Fetching sitemap from {}", sitemap_url);

        let pages = resolve_sitemap(&self.client, sitemap_url.as_str(), Vec::new()).await?;
        let listed = pages.len();
        let pages = dedup_pages(pages);

        if pages.len() < listed {
            tracing::debug!(
                "Dropped {} duplicate sitemap entries",
                listed - pages.len()
            );
        }

        Ok(pages)
    }

    /// Runs a complete validation
    ///
    /// This is the main entry point. It will:
    /// 1. Resolve the sitemap into a page list
    /// 2. Split the pages into one shard per configured worker
    /// 3. Crawl every shard in parallel
    /// 4. Aggregate the worker results
    ///
    /// Broken links do not make this fail; they are in the returned report.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - Every worker finished
    /// * `Err(ValidatorError)` - The sitemap could not be resolved or a
    ///   worker terminated abnormally
    pub async fn run(&self) -> Result<RunReport> {
        let pages = self.resolve_pages().await?;
        tracing::info!("Found {} pages to validate", pages.len());

        self.validate_pages(pages).await
    }

    /// Crawls an already resolved page list with the worker pool
    ///
    /// Exactly `workers` workers are spawned, even when some shards are
    /// empty. Each worker's visited set is seeded once, before any request
    /// is made, with the pages of every other shard.
    pub async fn validate_pages(&self, pages: Vec<String>) -> Result<RunReport> {
        let base_url = Url::parse(&self.config.site_url)?;
        let total = pages.len();

        let shards = partition(pages, self.config.workers);
        let seeds = other_pages(&shards);
        let (sinks, rx) = log_channel(shards.len());

        // Build every worker before spawning so config problems surface
        // before the first request
        let workers = shards
            .into_iter()
            .zip(seeds)
            .zip(sinks)
            .map(|((shard, seed), sink)| {
                CrawlWorker::new(
                    shard,
                    seed,
                    self.config.clone(),
                    base_url.clone(),
                    self.client.clone(),
                    sink,
                )
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::info!("Validating with {} workers", workers.len());
        let logger = spawn_logger(rx);

        let handles: Vec<JoinHandle<WorkerResult>> = workers
            .into_iter()
            .map(|worker| tokio::spawn(worker.run()))
            .collect();

        let mut report = RunReport {
            pages: total,
            ..RunReport::default()
        };
        for (index, result) in join_workers(handles).await?.into_iter().enumerate() {
            tracing::debug!(
                "Worker {} finished: {} passed, {} failed",
                index,
                result.passed,
                result.errors.len()
            );
            report.absorb(result);
        }

        // Every sink is gone once the workers have returned
        if let Err(e) = logger.await {
            tracing::warn!("Logger task ended abnormally: {}", e);
        }

        Ok(report)
    }
}

/// Awaits every worker in spawn order
///
/// The first worker that panicked or was cancelled fails the whole run;
/// the workers not yet joined are aborted.
async fn join_workers(handles: Vec<JoinHandle<WorkerResult>>) -> Result<Vec<WorkerResult>> {
    let mut results = Vec::with_capacity(handles.len());
    let mut handles = handles.into_iter().enumerate();

    while let Some((index, handle)) = handles.next() {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => {
                for (_, rest) in handles {
                    rest.abort();
                }
                return Err(ValidatorError::Worker {
                    index,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(results)
}

/// Removes repeated pages, keeping the first occurrence
fn dedup_pages(pages: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .filter(|page| seen.insert(visit_key(page)))
        .collect()
}
