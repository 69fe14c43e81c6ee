//! Job orchestration
//!
//! Creates crawl jobs, runs each one on its own tokio task, mirrors crawl
//! progress into the job store and implements cooperative cancellation.
//!
//! # Lifecycle
//!
//! ```text
//! create ─> queued ──start──> running ──> completed | failed
//!              │                 │
//!              └─────cancel──────┴──> cancelled
//! ```

mod progress;

use crate::config::{CrawlConfig, HttpSettings, Settings};
use crate::crawler::{run_crawl, CrawlOutcome, CrawlReport};
use crate::state::{Job, JobStatus, JobUpdate};
use crate::storage::{JobStore, StoreError, StoreResult};
use progress::JobProgress;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};

/// Runs crawl jobs against a shared job store
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<JobStore>,
    http: Arc<HttpSettings>,
    stats_flush_interval: u32,
}

impl Orchestrator {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `store` - Job store shared with anything else reading jobs
    /// * `settings` - Supplies the HTTP identity and the stats flush interval
    pub fn new(store: Arc<JobStore>, settings: &Settings) -> Self {
        Self {
            store,
            http: Arc::new(settings.http.clone()),
            stats_flush_interval: settings.jobs.stats_flush_interval,
        }
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// Records a new queued job and returns its id
    pub fn create(&self, config: CrawlConfig, config_id: Option<String>) -> StoreResult<String> {
        let job = self.store.create(Job::new(config, config_id))?;
        tracing::info!("Created job {}", job.id);
        Ok(job.id)
    }

    /// Launches a queued job on a background task
    ///
    /// Returns as soon as the job is marked running. The queued check and the
    /// move to running happen in one store update, so of two concurrent calls
    /// only one succeeds. The returned handle resolves when the job has
    /// reached its final state; dropping it does not stop the job.
    ///
    /// Must be called from within a tokio runtime, since the job is spawned
    /// onto the current one.
    ///
    /// # Returns
    ///
    /// * `Ok(JoinHandle)` - The job is running
    /// * `Err(StoreError::JobNotFound)` - No job has this id
    /// * `Err(StoreError::InvalidState)` - The job is not queued
    pub fn start(&self, id: &str) -> StoreResult<JoinHandle<()>> {
        let job = self
            .store
            .update(id, JobUpdate::started())
            .map_err(|e| match e {
                StoreError::InvalidState { job_id, status, .. } => StoreError::InvalidState {
                    job_id,
                    status,
                    action: "start".to_string(),
                },
                other => other,
            })?;
        tracing::info!("Starting job {}", job.id);

        let store = self.store.clone();
        let http = self.http.clone();
        let flush_interval = self.stats_flush_interval;

        Ok(tokio::spawn(async move {
            let job_id = job.id.clone();
            let worker = tokio::spawn(run_job(store.clone(), http, job, flush_interval));

            if let Err(e) = worker.await {
                let message = format!("Unknown Error: {}", join_error_message(e));
                tracing::error!("Job {} aborted: {}", job_id, message);
                record_finish(&store, &job_id, JobUpdate::finished(JobStatus::Failed).with_error(message));
            }
        }))
    }

    /// Creates a job and starts it immediately
    pub fn submit(
        &self,
        config: CrawlConfig,
        config_id: Option<String>,
    ) -> StoreResult<(String, JoinHandle<()>)> {
        let id = self.create(config, config_id)?;
        let handle = self.start(&id)?;
        Ok((id, handle))
    }

    /// Cancels a queued or running job
    ///
    /// A running crawl notices at its next progress event and stops there;
    /// an in-flight request is allowed to finish.
    pub fn cancel(&self, id: &str) -> StoreResult<Job> {
        let job = self.store.require(id)?;
        if job.status.is_terminal() {
            return Err(StoreError::InvalidState {
                job_id: job.id,
                status: job.status,
                action: "cancel".to_string(),
            });
        }

        let job = self
            .store
            .update(id, JobUpdate::finished(JobStatus::Cancelled))?;
        tracing::info!("Cancelled job {}", job.id);
        Ok(job)
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Job>> {
        self.store.get(id)
    }

    pub fn list(&self, limit: usize) -> StoreResult<Vec<Job>> {
        self.store.list(limit)
    }

    /// Polls until the job reaches a terminal state
    pub async fn wait(&self, id: &str, poll: Duration) -> StoreResult<Job> {
        loop {
            let job = self.store.require(id)?;
            if job.status.is_terminal() {
                return Ok(job);
            }
            tokio::time::sleep(poll).await;
        }
    }
}

/// Body of a job's task: run the crawl and record how it ended
async fn run_job(store: Arc<JobStore>, http: Arc<HttpSettings>, job: Job, flush_interval: u32) {
    let mut progress = JobProgress::new(store.clone(), job.id.clone(), flush_interval);

    match run_crawl(&job.config, &http, &mut progress).await {
        Ok(CrawlOutcome::Completed(report)) => {
            tracing::info!(
                "Job {} completed: {} pages, {} links, {} errors",
                job.id,
                report.stats.pages_crawled,
                report.stats.links_checked,
                report.stats.errors_found
            );
            record_finish(&store, &job.id, results(JobStatus::Completed, report));
        }
        Ok(CrawlOutcome::Cancelled(report)) => {
            tracing::info!("Job {} stopped after cancellation", job.id);
            record_finish(&store, &job.id, results(JobStatus::Cancelled, report).results_only());
        }
        Err(e) => {
            tracing::error!("Job {} failed: {}", job.id, e);
            record_finish(
                &store,
                &job.id,
                JobUpdate::finished(JobStatus::Failed).with_error(e.to_string()),
            );
        }
    }
}

fn results(status: JobStatus, report: CrawlReport) -> JobUpdate {
    JobUpdate::finished(status)
        .with_stats(report.stats)
        .with_report_path(report.report_path)
}

/// Applies a final update, keeping an earlier terminal status if one won the race
///
/// A job cancelled while its crawl was finishing stays cancelled, but still
/// gets the crawl's report path, stats and error.
fn record_finish(store: &JobStore, id: &str, update: JobUpdate) {
    let outcome = match store.update(id, update.clone()) {
        Err(StoreError::InvalidState { status, .. }) => {
            tracing::debug!("Job {} already {}; recording results only", id, status);
            store.update(id, update.results_only())
        }
        other => other,
    };

    if let Err(e) = outcome {
        tracing::error!("Failed to record final state of job {}: {}", id, e);
    }
}

fn join_error_message(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }

    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}
