//! URL validation
//!
//! Requested URLs are checked before any network activity so malformed input
//! surfaces as a client error rather than a transport failure.

use url::Url;

use crate::error::ValidationError;

/// Longest URL accepted for scraping
pub const MAX_URL_LEN: usize = 2048;

/// URL validation utilities
pub struct UrlValidator;

impl UrlValidator {
    /// Parse and validate a URL to scrape
    ///
    /// Accepts absolute `http`/`https` URLs with a host, after trimming
    /// surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Url, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        if raw.len() > MAX_URL_LEN {
            return Err(ValidationError::TooLong(MAX_URL_LEN));
        }

        let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl(format!("{raw}: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ValidationError::InvalidUrl(format!("{raw}: missing host")));
        }

        Ok(url)
    }

    /// Check if URL points to localhost
    pub fn is_localhost(url: &Url) -> bool {
        matches!(
            url.host_str(),
            Some("localhost" | "127.0.0.1" | "[::1]" | "0.0.0.0")
        )
    }
}
