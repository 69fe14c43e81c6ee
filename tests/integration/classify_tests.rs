//! Link classification against live mock servers

use crate::{mount_method_status, mount_status};
use deadlink_crawler::config::{CrawlConfig, DomainRule, HttpSettings};
use deadlink_crawler::crawler::{build_http_client, LinkClassifier};
use std::time::Duration;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn classifier(config: &CrawlConfig, timeout: Duration) -> LinkClassifier {
    let client = build_http_client(&HttpSettings::default(), timeout).unwrap();
    LinkClassifier::new(config, client)
}

#[tokio::test]
async fn test_ok_link() {
    let server = MockServer::start().await;
    mount_status(&server, "/ok", 200).await;

    let verdict = classifier(&CrawlConfig::default(), Duration::from_secs(5))
        .classify(&format!("{}/ok", server.uri()))
        .await;

    assert!(!verdict.is_error);
    assert_eq!(verdict.status_code, Some(200));
    assert_eq!(verdict.message, None);
}

#[tokio::test]
async fn test_head_rejected_falls_back_to_get() {
    let server = MockServer::start().await;
    mount_method_status(&server, "HEAD", "/no-head", 405).await;
    mount_method_status(&server, "GET", "/no-head", 200).await;

    let verdict = classifier(&CrawlConfig::default(), Duration::from_secs(5))
        .classify(&format!("{}/no-head", server.uri()))
        .await;

    assert!(!verdict.is_error);
    assert_eq!(verdict.status_code, Some(200));
}

#[tokio::test]
async fn test_head_not_found_confirmed_by_get() {
    let server = MockServer::start().await;
    mount_method_status(&server, "HEAD", "/missing", 404).await;
    mount_method_status(&server, "GET", "/missing", 410).await;

    let verdict = classifier(&CrawlConfig::default(), Duration::from_secs(5))
        .classify(&format!("{}/missing", server.uri()))
        .await;

    assert!(verdict.is_error);
    assert_eq!(verdict.message_or_empty(), "HTTP 410");
}

#[tokio::test]
async fn test_redirects_followed() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    mount_status(&server, "/new", 200).await;

    let verdict = classifier(&CrawlConfig::default(), Duration::from_secs(5))
        .classify(&format!("{}/old", server.uri()))
        .await;

    assert!(!verdict.is_error);
    assert_eq!(verdict.status_code, Some(200));
}

#[tokio::test]
async fn test_redirect_without_location_is_warning() {
    let server = MockServer::start().await;
    mount_status(&server, "/moved", 302).await;

    let verdict = classifier(&CrawlConfig::default(), Duration::from_secs(5))
        .classify(&format!("{}/moved", server.uri()))
        .await;

    assert!(!verdict.is_error);
    assert!(verdict.is_redirect());
    assert_eq!(verdict.message_or_empty(), "Redirect 302");
}

#[tokio::test]
async fn test_redirect_loop() {
    let server = MockServer::start().await;
    Mock::given(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&server)
        .await;

    let verdict = classifier(&CrawlConfig::default(), Duration::from_secs(5))
        .classify(&format!("{}/loop", server.uri()))
        .await;

    assert!(verdict.is_error);
    assert_eq!(verdict.message_or_empty(), "Too Many Redirects");
}

#[tokio::test]
async fn test_whitelisted_status() {
    let server = MockServer::start().await;
    mount_status(&server, "/private", 403).await;

    let verdict = classifier(&CrawlConfig::default(), Duration::from_secs(5))
        .classify(&format!("{}/private", server.uri()))
        .await;

    assert!(!verdict.is_error);
    assert_eq!(verdict.message_or_empty(), "Access restricted (403)");
}

#[tokio::test]
async fn test_domain_rule_allows_code() {
    let server = MockServer::start().await;
    mount_status(&server, "/throttled", 429).await;

    let mut config = CrawlConfig::default();
    config
        .domain_rules
        .insert("127.0.0.1".to_string(), DomainRule::new([429], "Local throttling"));

    let verdict = classifier(&config, Duration::from_secs(5))
        .classify(&format!("{}/throttled", server.uri()))
        .await;

    assert!(!verdict.is_error);
    assert_eq!(verdict.message_or_empty(), "Local throttling (429)");
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let verdict = classifier(&CrawlConfig::default(), Duration::from_millis(300))
        .classify(&format!("{}/slow", server.uri()))
        .await;

    assert!(verdict.is_error);
    assert_eq!(verdict.message_or_empty(), "Timeout");
    assert_eq!(verdict.status_code, None);
}

#[tokio::test]
async fn test_timeout_ignored_by_rule() {
    let server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut rule = DomainRule::new([], "Slow local host");
    rule.ignore_timeouts = true;
    let mut config = CrawlConfig::default();
    config.domain_rules.insert("127.0.0.1".to_string(), rule);

    let verdict = classifier(&config, Duration::from_millis(300))
        .classify(&format!("{}/slow", server.uri()))
        .await;

    assert!(!verdict.is_error);
    assert_eq!(verdict.message_or_empty(), "Slow local host (timeout ignored)");
}

#[tokio::test]
async fn test_connection_refused() {
    let verdict = classifier(&CrawlConfig::default(), Duration::from_secs(2))
        .classify("http://127.0.0.1:1/")
        .await;

    assert!(verdict.is_error);
    assert_eq!(verdict.message_or_empty(), "Connection Error");
}
