//! Feed fetcher.
//!
//! Retrieves the raw body of one feed endpoint. Parsing happens
//! separately in [`crate::news::normalize`] so cycles can be exercised
//! without the network by swapping in another [`FeedFetcher`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use reqwest::Client;

use crate::config::CrawlerConfig;
use crate::error::{NewsError, Result};

/// Retrieves raw feed bytes for an endpoint.
pub trait FeedFetcher: Send + Sync + 'static {
    /// Fetch the body of `url`. One request, no retries.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// HTTP feed fetcher with timeouts and a body size limit.
pub struct HttpFetcher {
    client: Client,
    max_feed_size: u64,
}

impl HttpFetcher {
    /// Create a new fetcher from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| NewsError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_feed_size {
            return Err(NewsError::Fetch(format!(
                "feed too large: {} bytes (max {} bytes)",
                size, self.max_feed_size
            )));
        }
        Ok(())
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NewsError::Fetch(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(NewsError::Fetch(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            self.check_size(content_length)?;
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NewsError::Fetch(format!("failed to read response: {}", e)))?;

        // Content-Length may be absent or wrong for chunked/compressed bodies.
        self.check_size(bytes.len() as u64)?;

        Ok(bytes.to_vec())
    }
}

type CannedResponses = HashMap<String, std::result::Result<Vec<u8>, String>>;

/// Fetcher that answers from canned responses instead of the network.
///
/// Used for offline runs and tests. URLs without a canned response fail
/// with a fetch error.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: Mutex<CannedResponses>,
    calls: AtomicUsize,
}

impl MemoryFetcher {
    /// Create a fetcher with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn set_body(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.responses().insert(url.into(), Ok(body.into()));
    }

    /// Fail requests for `url` with `message`.
    pub fn set_error(&self, url: impl Into<String>, message: impl Into<String>) {
        self.responses().insert(url.into(), Err(message.into()));
    }

    /// Number of fetches performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn responses(&self) -> MutexGuard<'_, CannedResponses> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FeedFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses().get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(NewsError::Fetch(message.clone())),
            None => Err(NewsError::Fetch(format!("no response for {}", url))),
        }
    }
}

/// Check that a feed URL is absolute http(s) with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| NewsError::Fetch(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(NewsError::Fetch(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(NewsError::Fetch("URL has no host".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher_with_limit(max_feed_size_bytes: u64) -> HttpFetcher {
        let config = CrawlerConfig {
            max_feed_size_bytes,
            ..CrawlerConfig::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    #[test]
    fn test_validate_url_valid() {
        assert!(validate_url("https://example.com/feed.xml").is_ok());
        assert!(validate_url("http://example.com/feed.xml").is_ok());
    }

    #[test]
    fn test_validate_url_invalid_scheme() {
        let result = validate_url("ftp://example.com/feed.xml");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unsupported URL scheme"));
    }

    #[test]
    fn test_validate_url_not_a_url() {
        let result = validate_url("not a url");
        assert!(matches!(result, Err(NewsError::Fetch(_))));
        assert!(result.unwrap_err().to_string().contains("invalid URL"));
    }

    #[test]
    fn test_check_size() {
        let fetcher = fetcher_with_limit(1024);
        assert!(fetcher.check_size(1024).is_ok());

        let err = fetcher.check_size(1025).unwrap_err();
        assert!(err.to_string().contains("feed too large"));
        assert!(err.is_source_local());
    }

    #[tokio::test]
    async fn test_memory_fetcher_responses() {
        let fetcher = MemoryFetcher::new();
        fetcher.set_body("https://a.example/feed", "<rss/>");
        fetcher.set_error("https://b.example/feed", "connection refused");

        assert_eq!(
            fetcher.fetch("https://a.example/feed").await.unwrap(),
            b"<rss/>".to_vec()
        );

        let err = fetcher.fetch("https://b.example/feed").await.unwrap_err();
        assert_eq!(err.to_string(), "fetch error: connection refused");

        let err = fetcher.fetch("https://c.example/feed").await.unwrap_err();
        assert!(matches!(err, NewsError::Fetch(_)));

        assert_eq!(fetcher.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url_without_request() {
        let fetcher = fetcher_with_limit(1024);
        let result = fetcher.fetch("file:///etc/passwd").await;
        assert!(matches!(result, Err(NewsError::Fetch(_))));
    }
}
