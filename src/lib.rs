//! newsgrab - heuristic news article extraction
//!
//! Extracts article records (title, link, author, date, source) from news-like
//! pages whose markup follows no shared schema, and serves the extraction over
//! a small HTTP API.
//!
//! # Architecture
//!
//! ```text
//! GET /scrape ──▶ ScrapeService ──▶ HttpFetcher ──▶ raw HTML
//!                      │                               │
//!                      ▼                               ▼
//!               ArticleExtractor ◀──────────────── Document
//!                      │
//!          ┌───────────┼───────────┐
//!          ▼           ▼           ▼
//!      Container    Headline     Link
//!        tier         tier       tier
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use newsgrab::extraction::{ArticleExtractor, Document};
//! use url::Url;
//!
//! let page = Url::parse("https://news.example.com/").unwrap();
//! let doc = Document::parse(
//!     r#"<article><h2>Rail strike called off after late talks</h2>
//!        <a href="/rail">more</a></article>"#,
//! );
//!
//! let articles = ArticleExtractor::default().extract(&doc, &page);
//! assert_eq!(articles.len(), 1);
//! assert_eq!(articles[0].link, "https://news.example.com/rail");
//! assert_eq!(articles[0].author, "Unknown");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod cors;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod handlers;
pub mod service;

// Re-exports for convenience
pub use config::{CorsMode, ScrapeConfig, ServerConfig};
pub use error::{Error, Result};
pub use extraction::{ArticleExtractor, ArticleRecord, Document, SelectorSet};
pub use fetch::HttpFetcher;
pub use service::{ScrapeReport, ScrapeService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
