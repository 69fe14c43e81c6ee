//! Job records and partial updates

use crate::config::CrawlConfig;
use crate::crawler::CrawlStats;
use crate::state::JobStatus;
use crate::storage::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One crawl job as persisted in the job table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,

    /// Snapshot of the configuration the job runs with
    pub config: CrawlConfig,

    /// Saved configuration the snapshot was taken from, if any
    #[serde(default)]
    pub config_id: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub report_path: Option<PathBuf>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub stats: CrawlStats,
}

impl Job {
    /// Creates a queued job with a fresh id and zeroed stats
    pub fn new(config: CrawlConfig, config_id: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            status: JobStatus::Queued,
            config,
            config_id,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            report_path: None,
            error: None,
            stats: CrawlStats::default(),
        }
    }

    /// Merges `update` into this record
    ///
    /// Fields left as `None` in the update are untouched. A status change
    /// must follow the job state machine, and a terminal job accepts neither
    /// a status nor a completion time; both cases fail with
    /// `StoreError::InvalidState` and leave the record unchanged.
    pub fn apply(&mut self, update: JobUpdate) -> Result<(), StoreError> {
        if let Some(next) = update.status {
            if !self.status.can_transition_to(next) {
                return Err(StoreError::InvalidState {
                    job_id: self.id.clone(),
                    status: self.status,
                    action: format!("move to {}", next),
                });
            }
        }

        if update.completed_at.is_some() && self.status.is_terminal() {
            return Err(StoreError::InvalidState {
                job_id: self.id.clone(),
                status: self.status,
                action: "set completion time".to_string(),
            });
        }

        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(started_at) = update.started_at {
            self.started_at = Some(started_at);
        }
        if let Some(completed_at) = update.completed_at {
            self.completed_at = Some(completed_at);
        }
        if let Some(report_path) = update.report_path {
            self.report_path = Some(report_path);
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        if let Some(stats) = update.stats {
            self.stats = stats;
        }

        Ok(())
    }
}

/// Partial update for a job; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub report_path: Option<PathBuf>,
    pub error: Option<String>,
    pub stats: Option<CrawlStats>,
}

impl JobUpdate {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn stats(stats: CrawlStats) -> Self {
        Self {
            stats: Some(stats),
            ..Self::default()
        }
    }

    /// Marks a job as running from now
    pub fn started() -> Self {
        Self {
            status: Some(JobStatus::Running),
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Moves a job to a terminal status, stamped now
    pub fn finished(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            completed_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_stats(mut self, stats: CrawlStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_report_path(mut self, report_path: Option<PathBuf>) -> Self {
        self.report_path = report_path;
        self
    }

    /// Drops the status change and completion time, keeping the results
    pub fn results_only(self) -> Self {
        Self {
            status: None,
            completed_at: None,
            ..self
        }
    }
}
