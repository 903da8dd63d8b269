//! Parsed page documents
//!
//! Thin wrapper over [`scraper::Html`] exposing exactly the traversal the
//! engine needs. Whole-document queries and candidate-scoped queries are
//! separate operations so a scoped lookup can never leak into the rest of the
//! page.

use scraper::{ElementRef, Html};

use super::selectors::Pattern;

/// A parsed HTML document
///
/// Parsing is error tolerant: empty or garbage markup yields a document in
/// which no pattern matches.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw markup
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// The underlying `scraper` tree
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Every element in the document matching `pattern`, in document order
    pub fn select_all<'a>(&'a self, pattern: &'a Pattern) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(pattern.selector())
    }

    /// Descendants of `scope` matching `pattern`, in document order
    ///
    /// `scope` itself is never returned.
    pub fn select_within<'a>(
        &self,
        scope: ElementRef<'a>,
        pattern: &'a Pattern,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        scope.select(pattern.selector())
    }

    /// First descendant of `scope` matching `pattern`
    pub fn first_within<'a>(&self, scope: ElementRef<'a>, pattern: &'a Pattern) -> Option<ElementRef<'a>> {
        self.select_within(scope, pattern).next()
    }

    /// Nearest `<a>` at or above `element`
    pub fn closest_anchor<'a>(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .find(is_anchor)
    }

    /// First `<a>` below `element`
    pub fn first_anchor_within<'a>(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(is_anchor)
    }

    /// First `<a>` sibling of `element` in document order
    pub fn first_sibling_anchor<'a>(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        // prev_siblings walks backwards, so the earliest match is the last one seen
        let earlier = element
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(is_anchor)
            .last();
        earlier.or_else(|| {
            element
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(is_anchor)
        })
    }
}

/// Concatenated descendant text, trimmed
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Attribute value, if present
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

fn is_anchor(element: &ElementRef<'_>) -> bool {
    element.value().name() == "a"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(raw: &str) -> Pattern {
        Pattern::parse(raw).unwrap()
    }

    #[test]
    fn test_scoped_query_stays_inside_candidate() {
        let doc = Document::parse(
            r#"<div class="a"><h2>inside</h2></div><div class="b"><h2>outside</h2></div>"#,
        );
        let container = pattern("div.a");
        let heading = pattern("h2");

        let scope = doc.select_all(&container).next().unwrap();
        let found: Vec<String> = doc.select_within(scope, &heading).map(text_of).collect();
        assert_eq!(found, vec!["inside".to_string()]);

        let global: Vec<String> = doc.select_all(&heading).map(text_of).collect();
        assert_eq!(global.len(), 2);
    }

    #[test]
    fn test_scoped_query_excludes_scope_itself() {
        let doc = Document::parse(r#"<article class="story"><p>x</p></article>"#);
        let article = pattern("article");
        let scope = doc.select_all(&article).next().unwrap();
        assert!(doc.first_within(scope, &article).is_none());
    }

    #[test]
    fn test_closest_anchor_includes_self_and_ancestors() {
        let doc = Document::parse(r#"<a href="/x"><span><h3>Title</h3></span></a>"#);
        let h3 = pattern("h3");
        let a = pattern("a");

        let heading = doc.select_all(&h3).next().unwrap();
        let anchor = doc.closest_anchor(heading).unwrap();
        assert_eq!(attr(anchor, "href"), Some("/x"));

        let anchor_el = doc.select_all(&a).next().unwrap();
        assert_eq!(doc.closest_anchor(anchor_el), Some(anchor_el));
    }

    #[test]
    fn test_first_sibling_anchor_in_document_order() {
        let doc = Document::parse(
            r#"<div><a href="/first">1</a><a href="/second">2</a><h3>T</h3><a href="/third">3</a></div>"#,
        );
        let h3 = pattern("h3");
        let heading = doc.select_all(&h3).next().unwrap();
        let sibling = doc.first_sibling_anchor(heading).unwrap();
        assert_eq!(attr(sibling, "href"), Some("/first"));
    }

    #[test]
    fn test_first_sibling_anchor_after_element() {
        let doc = Document::parse(r#"<div><h3>T</h3><span></span><a href="/after">x</a></div>"#);
        let h3 = pattern("h3");
        let heading = doc.select_all(&h3).next().unwrap();
        let sibling = doc.first_sibling_anchor(heading).unwrap();
        assert_eq!(attr(sibling, "href"), Some("/after"));
    }

    #[test]
    fn test_first_anchor_within() {
        let doc = Document::parse(r#"<h2><em>lead</em><a>no href</a><a href="/b">b</a></h2>"#);
        let h2 = pattern("h2");
        let heading = doc.select_all(&h2).next().unwrap();
        let anchor = doc.first_anchor_within(heading).unwrap();
        assert_eq!(attr(anchor, "href"), None);
        assert_eq!(text_of(anchor), "no href");
    }

    #[test]
    fn test_text_is_concatenated_and_trimmed() {
        let doc = Document::parse("<h1>\n  Breaking: <b>storm</b> hits coast  \n</h1>");
        let h1 = pattern("h1");
        let heading = doc.select_all(&h1).next().unwrap();
        assert_eq!(text_of(heading), "Breaking: storm hits coast");
    }

    #[test]
    fn test_garbage_markup_parses() {
        let doc = Document::parse("<<<>>> \u{0} </div></div><p");
        let article = pattern("article");
        assert_eq!(doc.select_all(&article).count(), 0);
    }
}
