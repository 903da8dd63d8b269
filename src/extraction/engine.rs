//! Article extraction engine
//!
//! Guesses article records on pages that share no schema by trying three
//! strategies in order and keeping the first one that produces anything:
//!
//! 1. **Container**: elements matching an article-container pattern, with
//!    title, link, date and author looked up inside each one.
//! 2. **Headline**: long heading texts anywhere on the page, linked through a
//!    surrounding, inner or neighbouring anchor.
//! 3. **Link**: anchors whose text is long enough to be a headline.
//!
//! Results are deduplicated by title and capped. The engine does no I/O and
//! holds no mutable state, so one instance can serve concurrent requests.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use scraper::ElementRef;
use tracing::{debug, instrument, trace};
use url::Url;

use super::article::{iso_timestamp, ArticleRecord, ExtractionOutcome, Tier, UNKNOWN_AUTHOR};
use super::document::{attr, text_of, Document};
use super::links::{resolve_link, resolve_or_page, LinkType};
use super::selectors::SelectorSet;

/// When the container tier stops trying further container patterns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContainerLock {
    /// Stop at the first pattern that yields at least one accepted record
    #[default]
    AcceptedRecord,
    /// Stop at the first pattern that matches any element, even if every
    /// match is rejected; the container tier then wins with zero records
    StructuralMatch,
}

/// Thresholds and limits for one extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    /// Container-tier titles must be longer than this (characters)
    pub min_container_title_len: usize,
    /// Headline-tier titles must be longer than this (characters)
    pub min_headline_title_len: usize,
    /// Link-tier titles must be longer than this (characters)
    pub min_link_title_len: usize,
    /// Maximum records returned
    pub max_articles: usize,
    /// Container pattern locking rule
    pub container_lock: ContainerLock,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            min_container_title_len: 10,
            min_headline_title_len: 15,
            min_link_title_len: 20,
            max_articles: 50,
            container_lock: ContainerLock::AcceptedRecord,
        }
    }
}

/// Per-call values shared by the tiers
struct Page<'a> {
    doc: &'a Document,
    url: &'a Url,
    source: String,
    now: String,
}

/// Heuristic article extractor
#[derive(Debug, Clone, Default)]
pub struct ArticleExtractor {
    selectors: SelectorSet,
    options: ExtractionOptions,
}

impl ArticleExtractor {
    /// Create an extractor over a selector set with default options
    pub fn new(selectors: SelectorSet) -> Self {
        Self {
            selectors,
            options: ExtractionOptions::default(),
        }
    }

    /// Replace the extraction options
    pub fn with_options(mut self, options: ExtractionOptions) -> Self {
        self.options = options;
        self
    }

    /// The selector set in use
    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// The options in use
    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Parse `markup` and extract articles from it
    pub fn extract_html(&self, markup: &str, page_url: &Url) -> Vec<ArticleRecord> {
        self.extract(&Document::parse(markup), page_url)
    }

    /// Extract articles, dating undated records with the current time
    pub fn extract(&self, doc: &Document, page_url: &Url) -> Vec<ArticleRecord> {
        self.extract_at(doc, page_url, Utc::now())
    }

    /// Extract articles, dating undated records with `now`
    pub fn extract_at(&self, doc: &Document, page_url: &Url, now: DateTime<Utc>) -> Vec<ArticleRecord> {
        self.extract_outcome(doc, page_url, now).articles
    }

    /// Extract articles and report which tier produced them
    #[instrument(level = "debug", skip(self, doc, page_url, now), fields(url = %page_url))]
    pub fn extract_outcome(
        &self,
        doc: &Document,
        page_url: &Url,
        now: DateTime<Utc>,
    ) -> ExtractionOutcome {
        let page = Page {
            doc,
            url: page_url,
            source: page_url.host_str().unwrap_or_default().to_string(),
            now: iso_timestamp(now),
        };

        let (tier, found) = if let Some(found) = self.container_tier(&page) {
            (Some(Tier::Container), found)
        } else if let Some(found) = self.headline_tier(&page) {
            (Some(Tier::Headline), found)
        } else {
            let found = self.link_tier(&page);
            let tier = (!found.is_empty()).then_some(Tier::Link);
            (tier, found)
        };

        let discovered = found.len();
        let articles = finalize(found, self.options.max_articles);
        debug!(
            tier = ?tier,
            discovered,
            returned = articles.len(),
            "Extraction finished"
        );

        ExtractionOutcome { tier, articles }
    }

    /// Container tier; `None` means fall through to the next tier
    fn container_tier(&self, page: &Page<'_>) -> Option<Vec<ArticleRecord>> {
        for pattern in self.selectors.articles() {
            let mut matched = 0usize;
            let mut accepted = Vec::new();

            for candidate in page.doc.select_all(pattern) {
                matched += 1;
                if let Some(record) = self.container_record(page, candidate) {
                    accepted.push(record);
                }
            }

            if matched == 0 {
                continue;
            }
            debug!(
                pattern = pattern.as_str(),
                matched,
                accepted = accepted.len(),
                "Container pattern matched"
            );

            match self.options.container_lock {
                ContainerLock::AcceptedRecord if accepted.is_empty() => continue,
                _ => return Some(accepted),
            }
        }
        None
    }

    fn container_record(&self, page: &Page<'_>, candidate: ElementRef<'_>) -> Option<ArticleRecord> {
        let doc = page.doc;

        let title = self.selectors.titles().iter().find_map(|pattern| {
            doc.first_within(candidate, pattern)
                .map(text_of)
                .filter(|text| !text.is_empty())
        })?;

        if char_len(&title) <= self.options.min_container_title_len {
            trace!(%title, "Container title too short");
            return None;
        }

        let link = resolve_or_page(
            doc.first_within(candidate, self.selectors.anchor())
                .and_then(|a| attr(a, "href")),
            page.url,
        );

        // The first date pattern with any match decides, even if it is blank
        let date = self
            .selectors
            .dates()
            .iter()
            .find_map(|pattern| doc.first_within(candidate, pattern))
            .map(|el| match attr(el, "datetime").filter(|d| !d.is_empty()) {
                Some(datetime) => datetime.to_string(),
                None => text_of(el),
            })
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| page.now.clone());

        let author = self
            .selectors
            .authors()
            .iter()
            .find_map(|pattern| {
                doc.first_within(candidate, pattern)
                    .map(text_of)
                    .filter(|text| !text.is_empty())
            })
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        Some(ArticleRecord {
            title,
            link,
            author,
            date,
            source: page.source.clone(),
        })
    }

    /// Headline tier; `None` means fall through to the next tier
    fn headline_tier(&self, page: &Page<'_>) -> Option<Vec<ArticleRecord>> {
        let doc = page.doc;

        for pattern in self.selectors.titles() {
            let accepted: Vec<ArticleRecord> = doc
                .select_all(pattern)
                .filter_map(|heading| {
                    let title = text_of(heading);
                    if char_len(&title) <= self.options.min_headline_title_len {
                        return None;
                    }
                    let href = [
                        doc.closest_anchor(heading),
                        doc.first_anchor_within(heading),
                        doc.first_sibling_anchor(heading),
                    ]
                    .into_iter()
                    .flatten()
                    .filter_map(|a| attr(a, "href"))
                    .find(|h| !h.is_empty());

                    Some(self.placeholder_record(page, title, resolve_or_page(href, page.url)))
                })
                .collect();

            if !accepted.is_empty() {
                debug!(pattern = pattern.as_str(), accepted = accepted.len(), "Headline pattern accepted");
                return Some(accepted);
            }
        }
        None
    }

    fn link_tier(&self, page: &Page<'_>) -> Vec<ArticleRecord> {
        let found: Vec<ArticleRecord> = page
            .doc
            .select_all(self.selectors.anchor())
            .filter_map(|anchor| {
                let title = text_of(anchor);
                if char_len(&title) <= self.options.min_link_title_len {
                    return None;
                }
                let href = attr(anchor, "href").filter(|h| !h.is_empty())?;
                if LinkType::classify(href, page.url).is_in_page() {
                    return None;
                }
                match resolve_link(href, page.url) {
                    Ok(link) => Some(self.placeholder_record(page, title, link.into())),
                    Err(e) => {
                        trace!(href, error = %e, "Skipping unresolvable link");
                        None
                    }
                }
            })
            .collect();

        debug!(accepted = found.len(), "Link scan finished");
        found
    }

    /// Record with the current time and unknown author
    fn placeholder_record(&self, page: &Page<'_>, title: String, link: String) -> ArticleRecord {
        ArticleRecord {
            title,
            link,
            author: UNKNOWN_AUTHOR.to_string(),
            date: page.now.clone(),
            source: page.source.clone(),
        }
    }
}

/// Drop repeated titles (first wins) and cap the list
fn finalize(found: Vec<ArticleRecord>, max: usize) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|record| seen.insert(record.title.clone()))
        .take(max)
        .collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn page() -> Url {
        Url::parse("https://news.example.com/world").unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn run(markup: &str) -> ExtractionOutcome {
        ArticleExtractor::default().extract_outcome(&Document::parse(markup), &page(), fixed_now())
    }

    #[test]
    fn test_container_fields() {
        let outcome = run(r#"
            <article>
              <h2>Harbour bridge reopens after repairs</h2>
              <a href="/bridge">Read more</a>
              <time datetime="2024-01-01T09:00:00Z">Jan 1</time>
              <span class="byline">By Ada Reyes</span>
            </article>
        "#);

        assert_eq!(outcome.tier, Some(Tier::Container));
        assert_eq!(
            outcome.articles,
            vec![ArticleRecord {
                title: "Harbour bridge reopens after repairs".to_string(),
                link: "https://news.example.com/bridge".to_string(),
                author: "By Ada Reyes".to_string(),
                date: "2024-01-01T09:00:00Z".to_string(),
                source: "news.example.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_title_pattern_order_beats_document_order() {
        let outcome = run(r#"
            <article>
              <h3>Secondary heading text here</h3>
              <h2>Primary heading text here</h2>
            </article>
        "#);
        assert_eq!(outcome.articles[0].title, "Primary heading text here");
    }

    #[test]
    fn test_blank_title_match_tries_next_pattern() {
        let outcome = run(r#"
            <article><h1>   </h1><span class="title">Fallback title text</span></article>
        "#);
        assert_eq!(outcome.articles[0].title, "Fallback title text");
    }

    #[test]
    fn test_date_text_used_without_datetime() {
        let outcome = run(r#"
            <article><h2>Markets close higher on Friday</h2><span class="date"> March 3 </span></article>
        "#);
        assert_eq!(outcome.articles[0].date, "March 3");
    }

    #[test]
    fn test_first_date_match_stops_search_even_if_blank() {
        let outcome = run(r#"
            <article>
              <h2>Markets close higher on Friday</h2>
              <time></time>
              <span class="date">March 3</span>
            </article>
        "#);
        assert_eq!(outcome.articles[0].date, "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let outcome = run("<article><h2>Local library extends hours</h2></article>");
        let record = &outcome.articles[0];
        assert_eq!(record.link, "https://news.example.com/world");
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert_eq!(record.date, "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_container_pattern_without_accepted_records_falls_through() {
        // `article` matches but its title is too short; `.story` is tried next
        let outcome = run(r#"
            <article><h2>Short</h2></article>
            <div class="story"><h2>Longer story headline</h2></div>
        "#);
        assert_eq!(outcome.tier, Some(Tier::Container));
        assert_eq!(outcome.articles[0].title, "Longer story headline");
    }

    #[test]
    fn test_structural_lock_keeps_empty_container_win() {
        let extractor = ArticleExtractor::default().with_options(ExtractionOptions {
            container_lock: ContainerLock::StructuralMatch,
            ..ExtractionOptions::default()
        });
        let doc = Document::parse(r#"
            <article><h2>Short</h2></article>
            <div class="story"><h2>Longer story headline</h2></div>
            <a href="/x">A very long link text that would qualify</a>
        "#);
        let outcome = extractor.extract_outcome(&doc, &page(), fixed_now());
        assert_eq!(outcome.tier, Some(Tier::Container));
        assert!(outcome.articles.is_empty());
    }

    #[test]
    fn test_headline_link_priority() {
        let outcome = run(r#"
            <div>
              <a href="/sibling">sib</a>
              <h3>Heading with inner anchor <a href="/inner">x</a></h3>
            </div>
            <a href="/outer"><h4>Heading wrapped by an anchor</h4></a>
        "#);
        assert_eq!(outcome.tier, Some(Tier::Headline));
        // h3 is the first title pattern with accepted headlines
        assert_eq!(outcome.articles.len(), 1);
        assert_eq!(outcome.articles[0].link, "https://news.example.com/inner");
    }

    #[test]
    fn test_headline_falls_back_to_sibling_then_page() {
        let outcome = run(r#"
            <div><h3>Heading next to an anchor</h3><a href="/next">more</a></div>
            <div><h3>Heading with no anchor at all</h3></div>
        "#);
        let links: Vec<&str> = outcome.articles.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://news.example.com/next", "https://news.example.com/world"]
        );
    }

    #[test]
    fn test_link_tier_filters() {
        let outcome = run(r##"
            <a href="/one">The first long enough anchor text</a>
            <a href="#section">An in-page anchor with long text</a>
            <a href="javascript:void(0)">A script pseudo-link with long text</a>
            <a href="">An empty href with plenty of text</a>
            <a href="/short">Too short</a>
            <a href="http://[::1">Unresolvable link with long text</a>
        "##);
        assert_eq!(outcome.tier, Some(Tier::Link));
        assert_eq!(outcome.articles.len(), 1);
        assert_eq!(outcome.articles[0].link, "https://news.example.com/one");
    }

    #[test]
    fn test_empty_document() {
        let outcome = run("");
        assert_eq!(outcome.tier, None);
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_finalize_dedups_then_caps() {
        let record = |title: &str, link: &str| ArticleRecord {
            title: title.to_string(),
            link: link.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            date: String::new(),
            source: String::new(),
        };
        let out = finalize(
            vec![record("a", "1"), record("b", "2"), record("a", "3"), record("c", "4")],
            2,
        );
        assert_eq!(out, vec![record("a", "1"), record("b", "2")]);
    }

    #[test]
    fn test_title_length_counts_characters() {
        // 11 characters, 22 bytes
        let outcome = run("<article><h2>ЖЖЖЖЖЖЖЖЖЖЖ</h2></article>");
        assert_eq!(outcome.articles.len(), 1);
        let outcome = run("<article><h2>ЖЖЖЖЖЖЖЖЖЖ</h2></article>");
        assert!(outcome.articles.is_empty());
    }
}
