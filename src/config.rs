//! Runtime configuration
//!
//! Settings come from command-line flags with environment fallbacks
//! (`HOST`, `PORT`, ...). [`ScrapeConfig`] covers everything needed to scrape a
//! page; [`ServerConfig`] adds the HTTP listener on top.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tracing::info;

use crate::error::{Error, Result};
use crate::extraction::{ArticleExtractor, SelectorConfig, SelectorSet};
use crate::fetch::{FetchOptions, HttpFetcher, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_USER_AGENT};
use crate::service::ScrapeService;

/// Default whole-request timeout for the HTTP API
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default listen port
pub const DEFAULT_PORT: u16 = 4000;

/// Cross-origin policy for the HTTP API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CorsMode {
    /// Any origin may call the API
    #[default]
    Permissive,
    /// Only localhost origins may call the API
    Localhost,
}

/// Fetching and extraction settings
#[derive(Debug, Clone, Args)]
pub struct ScrapeConfig {
    /// Timeout for fetching a page, in milliseconds
    #[arg(long, env = "NEWSGRAB_FETCH_TIMEOUT_MS", default_value_t = DEFAULT_FETCH_TIMEOUT_MS)]
    pub fetch_timeout_ms: u64,

    /// User agent sent when fetching pages
    #[arg(long, env = "NEWSGRAB_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// JSON file with custom selector lists (articles, titles, dates, authors)
    #[arg(long, env = "NEWSGRAB_SELECTORS")]
    pub selectors: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            selectors: None,
        }
    }
}

impl ScrapeConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout_ms == 0 {
            return Err(Error::generic("fetch timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Selector set from the configured file, or the built-in one
    pub fn selector_set(&self) -> Result<SelectorSet> {
        match &self.selectors {
            Some(path) => {
                let set = SelectorSet::from_config(&SelectorConfig::from_json_file(path)?)?;
                info!(path = %path.display(), "Using custom selectors");
                Ok(set)
            }
            None => Ok(SelectorSet::default()),
        }
    }

    /// Build the scrape service these settings describe
    pub fn build_service(&self) -> Result<ScrapeService> {
        self.validate()?;
        let fetcher = HttpFetcher::new(
            FetchOptions::default()
                .with_timeout_ms(self.fetch_timeout_ms)
                .with_user_agent(self.user_agent.clone()),
        )?;
        Ok(ScrapeService::new(
            fetcher,
            ArticleExtractor::new(self.selector_set()?),
        ))
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Timeout for a whole API request, in milliseconds
    #[arg(long, env = "NEWSGRAB_REQUEST_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,

    /// Cross-origin policy
    #[arg(long, value_enum, env = "NEWSGRAB_CORS", default_value_t = CorsMode::Permissive)]
    pub cors: CorsMode,

    /// Fetch and extraction settings
    #[command(flatten)]
    pub scrape: ScrapeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cors: CorsMode::Permissive,
            scrape: ScrapeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            return Err(Error::generic("request timeout must be greater than zero"));
        }
        self.scrape.validate()
    }

    /// Address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::generic(format!("invalid listen address {}:{}: {e}", self.host, self.port)))
    }
}
