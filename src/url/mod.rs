//! URL handling module
//!
//! This module provides domain normalization for rule lookups, anchor
//! normalization for link extraction, and the same-site test that decides
//! which links become pages to crawl.

mod domain;
mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, normalize_domain};
pub use normalize::{is_internal, normalize_link};

/// Parses a URL that the crawler is willing to request
///
/// # Returns
///
/// * `Ok(Url)` - An absolute http(s) URL with a host
/// * `Err(UrlError)` - The string cannot be requested
pub fn parse_http_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Turns a host into something safe to embed in a file name
///
/// `www.` is stripped and `.`, `-`, `:` become `_`.
pub fn domain_slug(host: &str) -> String {
    normalize_domain(host)
        .chars()
        .map(|c| match c {
            '.' | '-' | ':' => '_',
            other => other,
        })
        .collect()
}
