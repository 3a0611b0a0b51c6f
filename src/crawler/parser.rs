//! HTML parser for extracting anchor references
//!
//! Only `<a href>` values are harvested, verbatim and in document order.
//! Deciding which of them to follow is left to
//! [`crate::url::sanitize_relative_href`].

use scraper::{Html, Selector};

/// Extracts the raw `href` attribute of every anchor in an HTML document
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// The href values in document order, untrimmed and unresolved
///
/// # Example
///
/// ```
/// use mirror_crawl::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="docs/">Docs</a><a href="../up">Up</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["docs/", "../up"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}
