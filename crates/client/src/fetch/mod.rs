//! HTTP fetch pipeline for registered documents.
//!
//! ### Order of checks
//! Each fetch stops at the first failing step:
//! 1. URL shape and source host marker (`InvalidUrl`)
//! 2. Transport: DNS, connect, TLS, timeout, body read (`Transport`)
//! 3. Status must be exactly 200 (`BadStatus`)
//! 4. Decoded body must be non-empty (`EmptyBody`)
//! 5. Body is sanitized and returned
//!
//! No retries happen here; the next scheduled pass is the retry.

pub mod url;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, validate_source_url};

use crate::sanitize::sanitize;
use docmirror_core::{AppConfig, Error};

/// Why a single document could not be fetched.
///
/// Scoped to one entry; never aborts a refresh pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch failed: {0}")]
    Transport(String),

    #[error("Fetch failed: received HTTP {0} response from the server")]
    BadStatus(u16),

    #[error("No content fetched: the document may be empty or inaccessible")]
    EmptyBody,
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "docmirror/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Substring every source URL must contain (default: "docs.google.com")
    pub source_host: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "docmirror/0.1".to_string(),
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
            source_host: "docs.google.com".to_string(),
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            source_host: config.source_host.clone(),
        }
    }
}

/// A successfully fetched and sanitized document.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Where the content was served from, after redirects
    pub final_url: Url,
    /// Sanitized HTML
    pub content: String,
    /// Size of the decoded body before sanitization
    pub raw_bytes: usize,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Source of document content for the refresh pipeline.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch and sanitize one document.
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchFailure>;
}

/// HTTP fetch client.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpClient(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch(&self, url_str: &str) -> Result<FetchedDocument, FetchFailure> {
        let start = Instant::now();
        let url = validate_source_url(url_str, &self.config.source_host)
            .map_err(|e| FetchFailure::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(url = %url, status = status.as_u16(), "unexpected status");
            return Err(FetchFailure::BadStatus(status.as_u16()));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchFailure::Transport(format!("failed to read response: {e}")))?;

        if body.is_empty() {
            return Err(FetchFailure::EmptyBody);
        }

        let raw_bytes = body.len();
        let content = sanitize(&body);
        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes, {} after sanitizing)",
            url,
            final_url,
            fetch_ms,
            raw_bytes,
            content.len()
        );

        Ok(FetchedDocument { final_url, content, raw_bytes, fetch_ms })
    }
}
