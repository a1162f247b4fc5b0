//! Remote model index client.
//!
//! Fetches the package catalog and downloads model archives. All requests
//! share one retry policy: a bounded number of attempts with a fixed pause,
//! except HTTP 404 which is permanent and aborts immediately.

use std::time::Duration;

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use reqwest::StatusCode;

use crate::catalog::{Catalog, ModelDescriptor, parse_catalog};
use crate::error::{UotError, UotResult};

/// Remote package index location.
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/argosopentech/argospm-index/main/index.json";

/// Base URL model archives are downloaded from.
pub const DEFAULT_BASE_URL: &str = "https://data.argosopentech.com/argospm/v1/";

const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the package index.
pub struct IndexClient {
    http: reqwest::Client,
    index_url: String,
    base_url: String,
    attempts: u32,
    retry_delay: Duration,
}

impl IndexClient {
    pub fn new() -> UotResult<Self> {
        Self::with_urls(DEFAULT_INDEX_URL.to_string(), DEFAULT_BASE_URL.to_string())
    }

    pub fn with_urls(index_url: String, base_url: String) -> UotResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(DEFAULT_TIMEOUT)
            .read_timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| network_error(&index_url, e.into()))?;

        Ok(Self {
            http,
            index_url,
            base_url,
            attempts: DEFAULT_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Override the retry policy (mainly for tests).
    pub fn with_retry(mut self, attempts: u32, retry_delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and parse the remote catalog.
    pub async fn fetch_catalog(&self) -> UotResult<Catalog> {
        let url = self.index_url.clone();
        let body = self
            .retrying(&url, || async { self.fetch_body(&url).await })
            .await?;
        let catalog = parse_catalog(&body)?;
        info!(
            "package index lists {} models ({} entries skipped)",
            catalog.models.len(),
            catalog.skipped
        );
        Ok(catalog)
    }

    /// Download one model archive, reporting progress on stderr.
    pub async fn download(&self, descriptor: &ModelDescriptor) -> UotResult<Vec<u8>> {
        let url = descriptor.url(&self.base_url);
        let name = descriptor.filename();
        let bytes = self
            .retrying(&url, || async { self.fetch_archive(&url, &name).await })
            .await?;
        info!("downloaded {} ({} bytes)", name, bytes.len());
        Ok(bytes)
    }

    /// Run one request closure under the retry policy.
    async fn retrying<F, Fut>(&self, url: &str, request: F) -> UotResult<Vec<u8>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = UotResult<Vec<u8>>>,
    {
        let mut last_err = None;
        for attempt in 1..=self.attempts {
            if attempt > 1 {
                debug!("retrying {} (attempt {}/{})", url, attempt, self.attempts);
                tokio::time::sleep(self.retry_delay).await;
            }
            match request().await {
                Ok(bytes) => return Ok(bytes),
                Err(err @ UotError::NotFound { .. }) => return Err(err),
                Err(err) => {
                    warn!("request for {} failed: {}", url, err);
                    last_err = Some(err);
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| network_error(url, anyhow::anyhow!("no request attempts made"))))
    }

    async fn fetch_body(&self, url: &str) -> UotResult<Vec<u8>> {
        let response = self.checked_get(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| network_error(url, e.into()))?;
        Ok(bytes.to_vec())
    }

    async fn fetch_archive(&self, url: &str, name: &str) -> UotResult<Vec<u8>> {
        let response = self.checked_get(url).await?;
        let total = response.content_length().unwrap_or(0);
        let bar = download_bar(name, total);

        let mut bytes = Vec::with_capacity(total as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => {
                    bytes.extend_from_slice(&chunk);
                    bar.inc(chunk.len() as u64);
                }
                Err(e) => {
                    bar.finish_and_clear();
                    return Err(network_error(url, e.into()));
                }
            }
        }
        bar.finish_and_clear();
        Ok(bytes)
    }

    /// GET a URL and map the status: 404 is permanent, other failures are
    /// network errors eligible for retry.
    async fn checked_get(&self, url: &str) -> UotResult<reqwest::Response> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, e.into()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UotError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(network_error(url, anyhow::anyhow!("HTTP {}", status)));
        }
        Ok(response)
    }
}

fn network_error(url: &str, source: anyhow::Error) -> UotError {
    UotError::Network {
        url: url.to_string(),
        source,
    }
}

fn download_bar(name: &str, total: u64) -> ProgressBar {
    if total == 0 {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {bytes}")
                .unwrap(),
        );
        bar.set_message(name.to_string());
        return bar;
    }

    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:50}] {bytes}/{total_bytes}")
            .unwrap()
            .progress_chars("=> "),
    );
    bar.set_message(name.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_client() -> IndexClient {
        IndexClient::new()
            .unwrap()
            .with_retry(3, Duration::from_millis(1))
    }

    #[test]
    fn test_default_urls() {
        let client = IndexClient::new().unwrap();
        assert_eq!(client.index_url(), DEFAULT_INDEX_URL);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_urls() {
        let client = IndexClient::with_urls(
            "http://localhost:8080/index.json".to_string(),
            "http://localhost:8080/pkg/".to_string(),
        )
        .unwrap();
        assert_eq!(client.index_url(), "http://localhost:8080/index.json");
        assert_eq!(client.base_url(), "http://localhost:8080/pkg/");
    }

    #[test]
    fn test_with_retry_floors_attempts_at_one() {
        let client = IndexClient::new()
            .unwrap()
            .with_retry(0, Duration::from_millis(1));
        assert_eq!(client.attempts, 1);
    }

    #[test]
    fn test_download_bar_styles() {
        // Bounded bar when the length is known, spinner otherwise.
        assert_eq!(download_bar("x", 100).length(), Some(100));
        assert_eq!(download_bar("x", 0).length(), None);
    }

    // =========================================================================
    // Retry policy
    // =========================================================================

    #[tokio::test]
    async fn test_retrying_exhausts_attempts_on_transient_failures() {
        let client = fast_client();
        let calls = AtomicUsize::new(0);

        let result = client
            .retrying("http://x/", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(network_error("http://x/", anyhow::anyhow!("connection reset"))) }
            })
            .await;

        assert!(matches!(result, Err(UotError::Network { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retrying_never_retries_not_found() {
        let client = fast_client();
        let calls = AtomicUsize::new(0);

        let result = client
            .retrying("http://x/missing", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(UotError::NotFound {
                        url: "http://x/missing".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(UotError::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retrying_recovers_on_a_later_attempt() {
        let client = fast_client();
        let calls = AtomicUsize::new(0);

        let result = client
            .retrying("http://x/", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(network_error("http://x/", anyhow::anyhow!("timed out")))
                    } else {
                        Ok(b"payload".to_vec())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), b"payload");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
