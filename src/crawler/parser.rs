//! HTML parser for extracting links
//!
//! Only `<a href>` anchors are collected. Resolution and filtering of the
//! raw values happen in [`crate::url::resolve_link`].

use scraper::{Html, Selector};

/// Extracts the `href` of every anchor, in document order
///
/// The parsed document is dropped before returning, so callers can hold the
/// result across await points.
///
/// # Example
///
/// ```
/// use sitemap_link_validator::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/a">A</a><a name="x">no href</a><a href="https://b.org">B</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/a", "https://b.org"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
