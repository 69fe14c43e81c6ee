//! Job orchestration tests: lifecycle, persistence and cancellation

use crate::{mount_page, mount_status, test_config};
use deadlink_crawler::config::Settings;
use deadlink_crawler::output::read_report;
use deadlink_crawler::storage::StoreError;
use deadlink_crawler::{JobStatus, JobStore, Orchestrator};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

const POLL: Duration = Duration::from_millis(20);

fn json_orchestrator(data: &TempDir) -> Orchestrator {
    let store = Arc::new(JobStore::open_json(data.path()).unwrap());
    Orchestrator::new(store, &Settings::default())
}

fn sqlite_orchestrator(data: &TempDir) -> Orchestrator {
    let store = Arc::new(JobStore::open_sqlite(data.path()).unwrap());
    Orchestrator::new(store, &Settings::default())
}

async fn dead_link_site() -> (MockServer, MockServer) {
    let site = MockServer::start().await;
    let external = MockServer::start().await;

    let dead_url = format!("{}/x", external.uri());
    mount_page(&site, "/", &[("/about", "About"), (dead_url.as_str(), "External")]).await;
    mount_page(&site, "/about", &[]).await;
    mount_status(&external, "/x", 404).await;

    (site, external)
}

#[tokio::test]
async fn test_job_runs_to_completion() {
    let (site, _external) = dead_link_site().await;
    let data = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    let orch = json_orchestrator(&data);

    let (id, handle) = orch
        .submit(test_config(&site.uri(), reports.path()), Some("site".to_string()))
        .unwrap();
    handle.await.unwrap();

    let job = orch.wait(&id, POLL).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.started_at.is_some());
    assert!(job.completed_at.is_some());
    assert!(job.error.is_none());
    assert_eq!(job.stats.pages_crawled, 2);
    assert_eq!(job.stats.links_checked, 2);
    assert_eq!(job.stats.errors_found, 1);

    let report = job.report_path.expect("report path recorded");
    assert_eq!(read_report(&report).unwrap().len(), 1);
    assert_eq!(orch.store().active_count(), 0);
}

#[tokio::test]
async fn test_completed_job_persists_across_reopen() {
    let (site, _external) = dead_link_site().await;
    let data = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();

    let id = {
        let orch = sqlite_orchestrator(&data);
        let (id, handle) = orch
            .submit(test_config(&site.uri(), reports.path()), None)
            .unwrap();
        handle.await.unwrap();
        id
    };

    let store = JobStore::open_sqlite(data.path()).unwrap();
    let job = store.require(&id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.stats.errors_found, 1);
    assert_eq!(store.list(10).unwrap().len(), 1);
}

#[tokio::test]
async fn test_start_completed_job_rejected() {
    let (site, _external) = dead_link_site().await;
    let data = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    let orch = json_orchestrator(&data);

    let (id, handle) = orch
        .submit(test_config(&site.uri(), reports.path()), None)
        .unwrap();
    handle.await.unwrap();

    assert!(matches!(
        orch.start(&id),
        Err(StoreError::InvalidState { status: JobStatus::Completed, .. })
    ));
    assert!(matches!(
        orch.cancel(&id),
        Err(StoreError::InvalidState { status: JobStatus::Completed, .. })
    ));
}

#[tokio::test]
async fn test_double_start_rejected() {
    let (site, _external) = dead_link_site().await;
    let data = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    let orch = json_orchestrator(&data);

    let id = orch
        .create(test_config(&site.uri(), reports.path()), None)
        .unwrap();
    let handle = orch.start(&id).unwrap();

    assert!(matches!(orch.start(&id), Err(StoreError::InvalidState { .. })));
    handle.await.unwrap();
}

#[tokio::test]
async fn test_cancel_queued_job_never_runs() {
    let site = MockServer::start().await;
    let data = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    let orch = json_orchestrator(&data);

    let id = orch
        .create(test_config(&site.uri(), reports.path()), None)
        .unwrap();
    let job = orch.cancel(&id).unwrap();

    assert_eq!(job.status, JobStatus::Cancelled);
    assert!(job.started_at.is_none());
    assert!(site.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_cancel_running_job() {
    let site = MockServer::start().await;
    let slow = MockServer::start().await;
    let data = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    let orch = json_orchestrator(&data);

    let dead: Vec<String> = (0..5).map(|i| format!("{}/slow{}", slow.uri(), i)).collect();
    let links: Vec<(&str, &str)> = dead.iter().map(|u| (u.as_str(), "Slow")).collect();
    mount_page(&site, "/", &links).await;
    Mock::given(path("/slow0"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(300)))
        .mount(&slow)
        .await;
    for i in 1..5 {
        mount_status(&slow, &format!("/slow{}", i), 500).await;
    }

    let (id, handle) = orch
        .submit(test_config(&site.uri(), reports.path()), None)
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let cancelled = orch.cancel(&id).unwrap();
    assert_eq!(cancelled.status, JobStatus::Cancelled);

    handle.await.unwrap();

    let job = orch.get(&id).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Cancelled);
    assert!(job.error.is_none());
    assert_eq!(job.stats.links_checked, 1);
    assert_eq!(job.stats.errors_found, 1);

    let report = job.report_path.expect("partial report recorded");
    assert_eq!(read_report(&report).unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_newest_first() {
    let data = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    let orch = json_orchestrator(&data);

    let first = orch
        .create(test_config("https://a.example", reports.path()), None)
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = orch
        .create(test_config("https://b.example", reports.path()), None)
        .unwrap();

    let jobs = orch.list(10).unwrap();
    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    assert_eq!(orch.list(1).unwrap().len(), 1);
}
