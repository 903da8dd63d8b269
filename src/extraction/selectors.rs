//! Selector configuration
//!
//! A [`SelectorSet`] holds the ordered, pre-compiled CSS patterns the engine
//! tries when guessing article boundaries and fields. It is built once and
//! shared read-only by every extraction.

use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, ExtractionError, Result};

/// Patterns believed to wrap a single article
pub const DEFAULT_ARTICLE_PATTERNS: &[&str] = &[
    "article",
    ".article",
    ".post",
    ".news-item",
    ".story",
    "[data-testid=\"article\"]",
    ".entry",
    ".item",
    ".card",
    ".content-item",
    ".news-article",
];

/// Patterns for headline elements
pub const DEFAULT_TITLE_PATTERNS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    ".title",
    ".headline",
    "[data-testid=\"headline\"]",
    ".article-title",
    ".post-title",
    ".entry-title",
    ".news-title",
];

/// Patterns for publication dates
pub const DEFAULT_DATE_PATTERNS: &[&str] = &[
    "time",
    ".date",
    ".published",
    ".timestamp",
    "[datetime]",
    ".publish-date",
    ".post-date",
    ".article-date",
];

/// Patterns for bylines
pub const DEFAULT_AUTHOR_PATTERNS: &[&str] = &[
    ".author",
    ".byline",
    ".writer",
    "[data-testid=\"author\"]",
    ".post-author",
    ".article-author",
    "[rel=\"author\"]",
];

/// Anchors that carry a target
pub const ANCHOR_PATTERN: &str = "a[href]";

/// A compiled selector together with the text it was compiled from
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    selector: Selector,
}

impl Pattern {
    /// Compile a CSS pattern
    pub fn parse(raw: &str) -> std::result::Result<Self, ExtractionError> {
        let selector = Selector::parse(raw)
            .map_err(|e| ExtractionError::InvalidSelector(format!("{raw}: {e}")))?;
        Ok(Self {
            raw: raw.to_string(),
            selector,
        })
    }

    /// The pattern text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The compiled selector
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// Uncompiled selector lists, as read from a configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Article container patterns
    pub articles: Vec<String>,
    /// Title patterns
    pub titles: Vec<String>,
    /// Date patterns
    pub dates: Vec<String>,
    /// Author patterns
    pub authors: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let owned = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            articles: owned(DEFAULT_ARTICLE_PATTERNS),
            titles: owned(DEFAULT_TITLE_PATTERNS),
            dates: owned(DEFAULT_DATE_PATTERNS),
            authors: owned(DEFAULT_AUTHOR_PATTERNS),
        }
    }
}

impl SelectorConfig {
    /// Read a JSON selector configuration from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: SelectorConfig = serde_json::from_str(&raw)?;
        debug!(path = %path.as_ref().display(), "Loaded selector configuration");
        Ok(config)
    }
}

/// Ordered, compiled pattern lists used by the extraction engine
#[derive(Debug, Clone)]
pub struct SelectorSet {
    articles: Vec<Pattern>,
    titles: Vec<Pattern>,
    dates: Vec<Pattern>,
    authors: Vec<Pattern>,
    anchor: Pattern,
}

impl SelectorSet {
    /// Compile a selector configuration
    ///
    /// Every list must be non-empty and every pattern must be valid CSS.
    pub fn from_config(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            articles: compile_list("articles", &config.articles)?,
            titles: compile_list("titles", &config.titles)?,
            dates: compile_list("dates", &config.dates)?,
            authors: compile_list("authors", &config.authors)?,
            anchor: Pattern::parse(ANCHOR_PATTERN)?,
        })
    }

    /// Article container patterns, in priority order
    pub fn articles(&self) -> &[Pattern] {
        &self.articles
    }

    /// Title patterns, in priority order
    pub fn titles(&self) -> &[Pattern] {
        &self.titles
    }

    /// Date patterns, in priority order
    pub fn dates(&self) -> &[Pattern] {
        &self.dates
    }

    /// Author patterns, in priority order
    pub fn authors(&self) -> &[Pattern] {
        &self.authors
    }

    /// `a[href]`
    pub fn anchor(&self) -> &Pattern {
        &self.anchor
    }
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default()).expect("built-in selectors are valid CSS")
    }
}

impl TryFrom<SelectorConfig> for SelectorSet {
    type Error = Error;

    fn try_from(config: SelectorConfig) -> Result<Self> {
        Self::from_config(&config)
    }
}

fn compile_list(
    name: &'static str,
    raw: &[String],
) -> std::result::Result<Vec<Pattern>, ExtractionError> {
    if raw.is_empty() {
        return Err(ExtractionError::EmptySelectorList(name));
    }
    raw.iter().map(|p| Pattern::parse(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_compiles_every_pattern() {
        let set = SelectorSet::default();
        assert_eq!(set.articles().len(), DEFAULT_ARTICLE_PATTERNS.len());
        assert_eq!(set.titles().len(), DEFAULT_TITLE_PATTERNS.len());
        assert_eq!(set.dates().len(), DEFAULT_DATE_PATTERNS.len());
        assert_eq!(set.authors().len(), DEFAULT_AUTHOR_PATTERNS.len());
        assert_eq!(set.anchor().as_str(), "a[href]");
    }

    #[test]
    fn test_order_is_preserved() {
        let set = SelectorSet::default();
        assert_eq!(set.articles()[0].as_str(), "article");
        assert_eq!(set.titles()[3].as_str(), "h4");
        assert_eq!(set.dates()[0].as_str(), "time");
        assert_eq!(set.authors().last().unwrap().as_str(), "[rel=\"author\"]");
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let config = SelectorConfig {
            titles: vec!["h2".to_string(), "div[".to_string()],
            ..SelectorConfig::default()
        };
        let err = SelectorSet::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Extraction(ExtractionError::InvalidSelector(ref p)) if p.starts_with("div[")
        ));
    }

    #[test]
    fn test_empty_list_is_rejected() {
        let config = SelectorConfig {
            authors: Vec::new(),
            ..SelectorConfig::default()
        };
        let err = SelectorSet::try_from(config).unwrap_err();
        assert!(matches!(
            err,
            Error::Extraction(ExtractionError::EmptySelectorList("authors"))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "articles": [".teaser"],
            "titles": [".teaser-title"],
            "dates": [".teaser-date"],
            "authors": [".teaser-author"]
        }"#;
        let config: SelectorConfig = serde_json::from_str(json).unwrap();
        let set = SelectorSet::from_config(&config).unwrap();
        assert_eq!(set.articles()[0].as_str(), ".teaser");
    }
}
