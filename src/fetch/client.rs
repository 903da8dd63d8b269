//! HTTP page fetching
//!
//! Retrieves raw page markup with a per-request timeout and browser-like
//! headers. Transport failures are classified so the service shell can report
//! each condition distinctly. Nothing is retried.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;

/// Desktop browser user agent sent by default
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 15_000;

/// Options for the page fetcher
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for the whole fetch in milliseconds (default: 15000)
    pub timeout_ms: u64,
    /// User agent header (default: desktop Chrome)
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchOptions {
    /// Set the fetch timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches page markup over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout_ms: u64,
}

impl HttpFetcher {
    /// Build a fetcher
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .timeout(Duration::from_millis(options.timeout_ms))
            .user_agent(options.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            timeout_ms: options.timeout_ms,
        })
    }

    /// Configured timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Fetch the markup at `url`
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Page returned non-success status");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_ms)
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }

    fn classify(&self, err: reqwest::Error, url: &Url) -> FetchError {
        let host = url.host_str().unwrap_or_default().to_string();
        if err.is_timeout() {
            return FetchError::Timeout(self.timeout_ms);
        }
        if err.is_connect() {
            if refused(&err) {
                return FetchError::ConnectionRefused(host);
            }
            if dns_failure(&err) {
                return FetchError::HostNotFound(host);
            }
        }
        FetchError::Transport(err.to_string())
    }
}

/// Whether an I/O error in the source chain is a refused connection
fn refused(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = e.source();
    }
    false
}

/// Whether the source chain reports a failed name lookup
fn dns_failure(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(e) = source {
        if is_dns_message(&e.to_string()) {
            return true;
        }
        source = e.source();
    }
    false
}

fn is_dns_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("no such host")
        || lower.contains("nodename nor servname")
}
