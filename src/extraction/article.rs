//! Article records
//!
//! The output unit of the extraction engine and the tier that produced it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Author placeholder used when no byline is discoverable
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One extracted article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Trimmed headline text
    pub title: String,
    /// Absolute article URL, or the page URL when none resolved
    pub link: String,
    /// Byline text or [`UNKNOWN_AUTHOR`]
    pub author: String,
    /// Date found on the page, or the extraction time
    pub date: String,
    /// Hostname of the scraped page
    pub source: String,
}

/// Extraction strategy that produced a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Article container patterns
    Container,
    /// Bare headline elements
    Headline,
    /// Anchors with long text
    Link,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Container => "container",
            Tier::Headline => "headline",
            Tier::Link => "link",
        };
        f.write_str(name)
    }
}

/// Records produced by one extraction call and the tier that won
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    /// Winning tier, `None` when every tier came up empty
    pub tier: Option<Tier>,
    /// Deduplicated, capped records in discovery order
    pub articles: Vec<ArticleRecord>,
}

impl ExtractionOutcome {
    /// Whether no tier produced anything
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Render an instant the way browsers render `Date.toISOString()`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_serializes_five_string_fields() {
        let record = ArticleRecord {
            title: "Council approves new budget".to_string(),
            link: "https://news.example.com/budget".to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            date: "2024-03-01T08:00:00Z".to_string(),
            source: "news.example.com".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert_eq!(object["author"], "Unknown");
        assert_eq!(object["source"], "news.example.com");
    }

    #[test]
    fn test_iso_timestamp_has_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(iso_timestamp(at), "2024-05-06T07:08:09.000Z");
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(serde_json::to_string(&Tier::Headline).unwrap(), "\"headline\"");
        assert_eq!(Tier::Link.to_string(), "link");
    }
}
