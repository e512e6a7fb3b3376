//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the validator, including:
//! - Building the HTTP client with a browser user agent
//! - Following redirects transparently
//! - Retrying transient network failures with a fixed delay
//! - Error classification
//!
//! HTTP error statuses are not failures at this layer; a 404 comes back as
//! an ordinary response for the caller to judge.

use crate::{FetchError, FetchResult};
use reqwest::{redirect::Policy, Client, Response};
use std::future::Future;
use std::time::Duration;

/// User agent sent with every request
///
/// Some servers reject clients that do not look like a browser, which would
/// show up as false broken links.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.3; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/38.0.2125.111 Safari/537.36";

/// Maximum redirect hops followed for a single request
pub const MAX_REDIRECTS: usize = 10;

/// Retry behaviour for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Wait between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(5000),
        }
    }
}

/// The last error of an operation that never succeeded
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Attempts made before giving up
    pub attempts: u32,

    /// Whether the final error was classified as transient
    pub transient: bool,

    /// The final error
    pub error: E,
}

impl RetryPolicy {
    /// Runs `op` until it succeeds, fails permanently, or the attempt
    /// ceiling is reached
    ///
    /// `op` receives the 1-based attempt number. Only errors for which
    /// `is_transient` returns true are retried, each after sleeping for
    /// `delay`.
    pub async fn run<T, E, F, Fut, C>(&self, mut op: F, is_transient: C) -> Result<T, Exhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    let transient = is_transient(&error);
                    if !transient || attempt >= max_attempts {
                        return Err(Exhausted {
                            attempts: attempt,
                            transient,
                            error,
                        });
                    }

                    tracing::debug!(
                        "Attempt {}/{} failed, retrying in {:?}",
                        attempt,
                        max_attempts,
                        self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Returns true for failures where the request could not be established
/// or completed (connection refused, reset, timeout)
pub fn is_transient(error: &reqwest::Error) -> bool {
    if error.is_builder() || error.is_redirect() {
        return false;
    }

    error.is_connect() || error.is_timeout() || error.is_request()
}

/// Builds an HTTP client with proper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (TLS backend setup)
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP GET with bounded retry
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct RequestClient {
    client: Client,
    retry: RetryPolicy,
}

impl RequestClient {
    /// Creates a client with the browser user agent and the given retry policy
    pub fn new(retry: RetryPolicy) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?, retry))
    }

    /// Wraps an already configured `reqwest::Client`
    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// The retry policy in use
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Any HTTP status | Returned as `Ok(response)` |
    /// | Connect error / reset / timeout | Retry up to 3 attempts, 5s delay |
    /// | Invalid URL, redirect limit, other | Immediate `FetchError::Permanent` |
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - A response was received, whatever its status
    /// * `Err(FetchError)` - No response could be obtained
    pub async fn fetch(&self, url: &str) -> FetchResult<Response> {
        self.retry
            .run(|_| self.client.get(url).send(), is_transient)
            .await
            .map_err(|exhausted| {
                if exhausted.transient {
                    FetchError::Transient {
                        url: url.to_string(),
                        attempts: exhausted.attempts,
                        source: exhausted.error,
                    }
                } else {
                    FetchError::Permanent {
                        url: url.to_string(),
                        source: exhausted.error,
                    }
                }
            })
    }
}
