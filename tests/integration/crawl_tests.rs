//! End-to-end crawl traversal tests

use crate::{mount_page, mount_status, test_config};
use deadlink_crawler::config::HttpSettings;
use deadlink_crawler::crawler::{run_crawl, CrawlOutcome, ProgressEvent, ProgressSink};
use deadlink_crawler::output::read_report;
use deadlink_crawler::DeadlinkError;
use tempfile::TempDir;
use wiremock::MockServer;

/// Sink that records every event
#[derive(Default)]
struct Recorder {
    events: Vec<ProgressEvent>,
}

impl ProgressSink for Recorder {
    fn emit(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

impl Recorder {
    fn kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(ProgressEvent::kind).collect()
    }

    fn infos(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Info { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Sink that cancels once `after` links have been checked
struct CancelAfter {
    after: usize,
    checked: usize,
    events: Vec<ProgressEvent>,
}

impl ProgressSink for CancelAfter {
    fn emit(&mut self, event: &ProgressEvent) {
        if matches!(event, ProgressEvent::LinkChecked { .. }) {
            self.checked += 1;
        }
        self.events.push(event.clone());
    }

    fn is_cancelled(&mut self) -> bool {
        self.checked >= self.after
    }
}

#[tokio::test]
async fn test_crawl_finds_external_dead_link() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let reports = TempDir::new().unwrap();

    let dead_url = format!("{}/x", external.uri());
    mount_page(&site, "/", &[("/about", "About"), (dead_url.as_str(), "External")]).await;
    mount_page(&site, "/about", &[]).await;
    mount_status(&external, "/x", 404).await;

    let config = test_config(&site.uri(), reports.path());
    let mut sink = Recorder::default();
    let outcome = run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap();

    let report = match outcome {
        CrawlOutcome::Completed(report) => report,
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert_eq!(report.stats.pages_crawled, 2);
    assert_eq!(report.stats.links_checked, 2);
    assert_eq!(report.stats.errors_found, 1);

    let path = report.report_path.expect("report should be written");
    let records = read_report(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].error_type, "HTTP 404");
    assert_eq!(records[0].link_url, dead_url);
    assert_eq!(records[0].link_text, "External");
    assert_eq!(records[0].source_page, format!("{}/", site.uri()));

    let kinds = sink.kinds();
    assert_eq!(kinds.first(), Some(&"start"));
    assert_eq!(kinds.get(1), Some(&"page_crawled"));
    assert_eq!(kinds.last(), Some(&"complete"));
    assert!(sink.infos().contains(&"Found 2 links on this page"));
}

#[tokio::test]
async fn test_crawl_without_errors_writes_no_report() {
    let site = MockServer::start().await;
    let reports = TempDir::new().unwrap();
    let out_dir = reports.path().join("reports");

    mount_page(&site, "/", &[("/about", "About")]).await;
    mount_page(&site, "/about", &[("/", "Home")]).await;

    let config = test_config(&site.uri(), &out_dir);
    let mut sink = Recorder::default();
    let outcome = run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap();

    let report = outcome.report();
    assert!(report.report_path.is_none());
    assert_eq!(report.stats.errors_found, 0);
    assert_eq!(report.stats.pages_crawled, 2);
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn test_non_200_page_warns_and_is_not_parsed() {
    let site = MockServer::start().await;
    let reports = TempDir::new().unwrap();

    mount_page(&site, "/", &[("/gone", "Gone")]).await;
    mount_status(&site, "/gone", 404).await;

    let config = test_config(&site.uri(), reports.path());
    let mut sink = Recorder::default();
    let outcome = run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap();

    let stats = outcome.report().stats;
    assert_eq!(stats.pages_crawled, 2);
    assert_eq!(stats.links_checked, 1);
    assert_eq!(stats.errors_found, 1);

    let gone = format!("{}/gone", site.uri());
    assert!(sink.events.iter().any(|e| matches!(
        e,
        ProgressEvent::Warning { url, status_code: 404 } if *url == gone
    )));
}

#[tokio::test]
async fn test_max_depth_zero_checks_but_does_not_follow() {
    let site = MockServer::start().await;
    let reports = TempDir::new().unwrap();

    mount_page(&site, "/", &[("/about", "About")]).await;
    mount_page(&site, "/about", &[("/deeper", "Deeper")]).await;

    let mut config = test_config(&site.uri(), reports.path());
    config.max_depth = Some(0);

    let mut sink = Recorder::default();
    let outcome = run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap();

    let stats = outcome.report().stats;
    assert_eq!(stats.pages_crawled, 1);
    assert_eq!(stats.links_checked, 1);
}

#[tokio::test]
async fn test_links_checked_once_per_crawl() {
    let site = MockServer::start().await;
    let reports = TempDir::new().unwrap();

    mount_page(&site, "/", &[("/a", "A"), ("/a#part", "A again"), ("/b", "B")]).await;
    mount_page(&site, "/a", &[("/b", "B"), ("/", "Home")]).await;
    mount_page(&site, "/b", &[]).await;

    let mut config = test_config(&site.uri(), reports.path());
    config.show_skipped_links = true;

    let mut sink = Recorder::default();
    let outcome = run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap();

    let stats = outcome.report().stats;
    assert_eq!(stats.pages_crawled, 3);
    // `/a`, `/b` from the seed page, then `/` from `/a`
    assert_eq!(stats.links_checked, 3);

    let infos = sink.infos();
    let skipped_a = format!("Skipped (already checked): {}/a", site.uri());
    assert!(infos.contains(&skipped_a.as_str()));
    assert!(infos.contains(&"Summary: 2 checked, 1 skipped (already checked)"));
}

#[tokio::test]
async fn test_skipped_links_silent_by_default() {
    let site = MockServer::start().await;
    let reports = TempDir::new().unwrap();

    mount_page(&site, "/", &[("/a", "A"), ("/a", "A")]).await;
    mount_page(&site, "/a", &[]).await;

    let config = test_config(&site.uri(), reports.path());
    let mut sink = Recorder::default();
    run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap();

    assert!(!sink.infos().iter().any(|m| m.starts_with("Skipped")));
    assert!(!sink.infos().iter().any(|m| m.starts_with("Summary")));
}

#[tokio::test]
async fn test_cancellation_stops_and_flushes_report() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let reports = TempDir::new().unwrap();

    let dead: Vec<String> = (0..3).map(|i| format!("{}/dead{}", external.uri(), i)).collect();
    let links: Vec<(&str, &str)> = dead.iter().map(|u| (u.as_str(), "Dead")).collect();
    mount_page(&site, "/", &links).await;
    for i in 0..3 {
        mount_status(&external, &format!("/dead{}", i), 500).await;
    }

    let config = test_config(&site.uri(), reports.path());
    let mut sink = CancelAfter {
        after: 1,
        checked: 0,
        events: Vec::new(),
    };
    let outcome = run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap();

    assert!(outcome.is_cancelled());
    let report = outcome.into_report();
    assert_eq!(report.stats.links_checked, 1);
    assert_eq!(report.stats.errors_found, 1);

    let records = read_report(&report.report_path.expect("partial report")).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].error_type, "HTTP 500");

    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, ProgressEvent::Complete { .. })));
}

#[tokio::test]
async fn test_unreachable_seed_emits_error_and_completes() {
    let reports = TempDir::new().unwrap();
    let config = test_config("http://127.0.0.1:1/", reports.path());

    let mut sink = Recorder::default();
    let outcome = run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap();

    assert!(!outcome.is_cancelled());
    assert_eq!(outcome.report().stats.pages_crawled, 1);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        ProgressEvent::Error { error_type, .. } if error_type.starts_with("Crawl error: ")
    )));
}

#[tokio::test]
async fn test_missing_start_url_is_rejected() {
    let reports = TempDir::new().unwrap();
    let mut config = test_config("https://example.com", reports.path());
    config.start_url = None;

    let mut sink = Recorder::default();
    let err = run_crawl(&config, &HttpSettings::default(), &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, DeadlinkError::MissingStartUrl));
    assert!(sink.events.is_empty());
}
