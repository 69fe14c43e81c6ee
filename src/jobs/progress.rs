//! Progress bridge between a running crawl and the job store

use crate::crawler::{CrawlStats, ProgressEvent, ProgressSink};
use crate::state::{JobStatus, JobUpdate};
use crate::storage::JobStore;
use std::sync::Arc;

/// Sink handed to a job's crawl
///
/// Reports cancellation by re-reading the job status from the store, logs
/// every event, and persists stats snapshots on page boundaries, on
/// completion, and every `flush_interval` checked links.
pub(crate) struct JobProgress {
    store: Arc<JobStore>,
    job_id: String,
    flush_interval: u64,
    links_since_flush: u64,
}

impl JobProgress {
    pub(crate) fn new(store: Arc<JobStore>, job_id: String, flush_interval: u32) -> Self {
        Self {
            store,
            job_id,
            flush_interval: u64::from(flush_interval.max(1)),
            links_since_flush: 0,
        }
    }

    fn flush(&mut self, stats: CrawlStats) {
        self.links_since_flush = 0;
        if let Err(e) = self.store.update(&self.job_id, JobUpdate::stats(stats)) {
            tracing::warn!("Job {}: failed to save stats: {}", self.job_id, e);
        }
    }

    fn log(&self, event: &ProgressEvent) {
        let id = &self.job_id;
        match event {
            ProgressEvent::Start {
                start_url,
                max_depth,
                ..
            } => match max_depth {
                Some(depth) => tracing::info!("Job {}: crawling {} (max depth {})", id, start_url, depth),
                None => tracing::info!("Job {}: crawling {}", id, start_url),
            },
            ProgressEvent::PageCrawled { url, .. } => {
                tracing::info!("Job {}: page {}", id, url)
            }
            ProgressEvent::Warning { url, status_code } => {
                tracing::warn!("Job {}: {} answered {}", id, url, status_code)
            }
            ProgressEvent::Error { url, error_type } => {
                tracing::warn!("Job {}: {} - {}", id, url, error_type)
            }
            ProgressEvent::Success { url } => tracing::debug!("Job {}: ok {}", id, url),
            ProgressEvent::Info { message } => tracing::info!("Job {}: {}", id, message),
            ProgressEvent::LinkChecked { stats } => {
                tracing::trace!("Job {}: {} links checked", id, stats.links_checked)
            }
            ProgressEvent::Complete { stats } => tracing::info!(
                "Job {}: finished, {} pages, {} links, {} errors",
                id,
                stats.pages_crawled,
                stats.links_checked,
                stats.errors_found
            ),
        }
    }
}

impl ProgressSink for JobProgress {
    fn emit(&mut self, event: &ProgressEvent) {
        self.log(event);

        match event {
            ProgressEvent::PageCrawled { stats, .. } | ProgressEvent::Complete { stats } => {
                self.flush(*stats)
            }
            ProgressEvent::LinkChecked { stats } => {
                self.links_since_flush += 1;
                if self.links_since_flush >= self.flush_interval {
                    self.flush(*stats);
                }
            }
            _ => {}
        }
    }

    fn is_cancelled(&mut self) -> bool {
        match self.store.status(&self.job_id) {
            Ok(status) => status == JobStatus::Cancelled,
            Err(e) => {
                tracing::warn!("Job {}: failed to read status: {}", self.job_id, e);
                false
            }
        }
    }
}
