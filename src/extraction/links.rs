//! Link resolution and classification
//!
//! Hrefs found on a page are resolved against the page URL. Failures are
//! returned to the caller, which decides whether to fall back to the page URL
//! or drop the candidate.

use serde::{Deserialize, Serialize};
use url::Url;

/// Type of link, judged from the raw href
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Same host as the page
    Internal,
    /// Different host
    External,
    /// Contains a fragment marker
    Anchor,
    /// mailto: link
    Email,
    /// tel: link
    Phone,
    /// javascript: pseudo-link
    JavaScript,
    /// Could not be resolved
    Other,
}

impl LinkType {
    /// Classify `href` as found on the page at `base`
    ///
    /// Any href containing `#` counts as an anchor, and any href containing
    /// `javascript:` counts as a script link, wherever the marker appears.
    pub fn classify(href: &str, base: &Url) -> Self {
        let lower = href.trim().to_ascii_lowercase();
        if lower.contains("javascript:") {
            LinkType::JavaScript
        } else if lower.contains('#') {
            LinkType::Anchor
        } else if lower.starts_with("mailto:") {
            LinkType::Email
        } else if lower.starts_with("tel:") {
            LinkType::Phone
        } else {
            match resolve_link(href, base) {
                Ok(url) if url.host_str() == base.host_str() => LinkType::Internal,
                Ok(_) => LinkType::External,
                Err(_) => LinkType::Other,
            }
        }
    }

    /// Whether following the link stays on the current page
    pub fn is_in_page(self) -> bool {
        matches!(self, LinkType::Anchor | LinkType::JavaScript)
    }
}

/// Resolve `href` relative to `base`
///
/// Absolute hrefs are parsed as-is; everything else is joined onto `base`.
pub fn resolve_link(href: &str, base: &Url) -> Result<Url, url::ParseError> {
    base.join(href.trim())
}

/// Resolve `href`, substituting the page URL when it cannot be resolved
pub fn resolve_or_page(href: Option<&str>, base: &Url) -> String {
    match href.map(str::trim).filter(|h| !h.is_empty()) {
        Some(href) => resolve_link(href, base)
            .map(String::from)
            .unwrap_or_else(|_| base.to_string()),
        None => base.to_string(),
    }
}
