//! Scrape pipeline
//!
//! Validate → fetch → parse → extract for a single URL. Each call is
//! independent; the service itself is immutable and shared behind an `Arc`.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::Result;
use crate::extraction::{ArticleExtractor, ArticleRecord, Document, Tier};
use crate::fetch::{FetchOptions, HttpFetcher, UrlValidator};

/// Result of scraping one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// Normalized page URL
    pub url: String,
    /// Tier that produced the records
    pub tier: Option<Tier>,
    /// Extracted records
    pub articles: Vec<ArticleRecord>,
    /// Wall time for fetch and extraction, in milliseconds
    pub elapsed_ms: u64,
}

/// Fetches pages and extracts article records from them
#[derive(Debug, Clone)]
pub struct ScrapeService {
    fetcher: HttpFetcher,
    extractor: Arc<ArticleExtractor>,
}

impl ScrapeService {
    /// Create a service from its parts
    pub fn new(fetcher: HttpFetcher, extractor: ArticleExtractor) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
        }
    }

    /// Service with default fetch options and the built-in selectors
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            HttpFetcher::new(FetchOptions::default())?,
            ArticleExtractor::default(),
        ))
    }

    /// The extractor in use
    pub fn extractor(&self) -> &ArticleExtractor {
        &self.extractor
    }

    /// Validate `raw_url`, fetch it and extract articles
    ///
    /// An empty article list is a successful outcome. Validation and
    /// transport failures are returned as errors.
    #[instrument(skip(self))]
    pub async fn scrape(&self, raw_url: &str) -> Result<ScrapeReport> {
        let url = UrlValidator::parse(raw_url)?;
        if UrlValidator::is_localhost(&url) {
            debug!(%url, "Scraping a local address");
        }

        let started = Instant::now();
        let markup = self.fetcher.fetch(&url).await?;
        let (tier, articles) = self.extract(&markup, &url);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            %url,
            tier = ?tier,
            count = articles.len(),
            elapsed_ms,
            "Scrape complete"
        );

        Ok(ScrapeReport {
            url: url.to_string(),
            tier,
            articles,
            elapsed_ms,
        })
    }

    fn extract(&self, markup: &str, url: &Url) -> (Option<Tier>, Vec<ArticleRecord>) {
        let doc = Document::parse(markup);
        let outcome = self.extractor.extract_outcome(&doc, url, chrono::Utc::now());
        (outcome.tier, outcome.articles)
    }
}
