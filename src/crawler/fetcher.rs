//! HTTP fetcher implementation
//!
//! This module builds the per-crawl HTTP client and fetches pages whose
//! links are to be extracted. Link checks share the same client.

use crate::config::HttpSettings;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of fetching a page for link extraction
#[derive(Debug)]
pub enum PageFetch {
    /// The page answered 200; its body is ready for parsing
    Body(String),

    /// The page answered with any other status
    Status(u16),

    /// The request failed before a status was received
    Failed(String),
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `http` - User agent and redirect limit
/// * `timeout` - Total timeout applied to every request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use deadlink_crawler::config::HttpSettings;
/// use deadlink_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&HttpSettings::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(http: &HttpSettings, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(http.user_agent.as_str())
        .timeout(timeout)
        .redirect(Policy::limited(http.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page with GET, following redirects
///
/// Only an exact 200 yields a body; other statuses are reported so the
/// caller can warn about the page without extracting from it.
pub async fn fetch_page(client: &Client, url: &Url) -> PageFetch {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return PageFetch::Failed(e.to_string()),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return PageFetch::Status(status.as_u16());
    }

    match response.text().await {
        Ok(body) => PageFetch::Body(body),
        Err(e) => PageFetch::Failed(e.to_string()),
    }
}
