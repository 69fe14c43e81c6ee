//! HTML parser for extracting anchor links
//!
//! Parsing is synchronous and returns owned data, so no parsed document is
//! ever held across an await point.

use crate::url::normalize_link;
use scraper::{Html, Selector};
use url::Url;

/// Text recorded for anchors that have no visible text
pub const NO_TEXT_PLACEHOLDER: &str = "[No text]";

/// An anchor found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Absolute, fragment-free target
    pub url: Url,

    /// Visible anchor text, or the placeholder
    pub text: String,
}

/// Extracts every checkable anchor from an HTML document
///
/// # Extraction Rules
///
/// - Only `<a href="...">` elements are considered
/// - Targets go through [`normalize_link`]: fragments are stripped, and
///   empty, `mailto:`, `tel:` and `javascript:` targets are dropped
/// - Link text is each text node trimmed and concatenated
///
/// Links are returned in document order, duplicates included.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page URL, for resolving relative links
///
/// # Example
///
/// ```
/// use deadlink_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<body><a href="/about#team">About <b>us</b></a><a href="mailto:x@y.z">Mail</a></body>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].url.as_str(), "https://example.com/about");
/// assert_eq!(links[0].text, "Aboutus");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<ExtractedLink> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let url = normalize_link(href, base_url)?;

            let text: String = element.text().map(str::trim).collect();
            let text = if text.is_empty() {
                NO_TEXT_PLACEHOLDER.to_string()
            } else {
                text
            };

            Some(ExtractedLink { url, text })
        })
        .collect()
}
