//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive full
//! crawls and jobs end-to-end.

mod classify_tests;
mod crawl_tests;
mod job_tests;

use deadlink_crawler::config::CrawlConfig;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML page holding the given `(href, text)` anchors
pub fn html_page(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(href, text)| format!("<a href=\"{}\">{}</a>\n", href, text))
        .collect();
    format!("<html><head><title>Test</title></head><body>\n{}</body></html>", anchors)
}

/// Serves an HTML page at `route` for every method
pub async fn mount_page(server: &MockServer, route: &str, links: &[(&str, &str)]) {
    Mock::given(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(html_page(links)),
        )
        .mount(server)
        .await;
}

/// Answers `status` at `route` for every method
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Answers `status` at `route` for one method only
pub async fn mount_method_status(server: &MockServer, verb: &str, route: &str, status: u16) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Crawl config for tests: no pacing, short timeout, reports under `reports_dir`
pub fn test_config(start_url: &str, reports_dir: &Path) -> CrawlConfig {
    let mut config = CrawlConfig::for_url(start_url);
    config.delay = 0.0;
    config.timeout = 5.0;
    config.output_dir = reports_dir.to_path_buf();
    config
}
