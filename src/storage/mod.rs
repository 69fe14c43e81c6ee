//! Storage module for persisting crawl jobs
//!
//! This module handles job persistence, including:
//! - The `JobTable` backends (a JSON file or a SQLite database)
//! - The process-wide lock around every read-modify-write of the table
//! - The in-memory cache of active jobs consulted before the table

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonJobTable;
pub use sqlite::SqliteJobTable;
pub use traits::{JobMap, JobTable, StoreError, StoreResult};

use crate::config::{StorageBackend, StorageSettings};
use crate::state::{Job, JobStatus, JobUpdate};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct StoreInner {
    table: Box<dyn JobTable>,
    /// Jobs that have not reached a terminal state
    active: HashMap<String, Job>,
}

/// Durable job table shared by every running job
///
/// All operations take one lock for their whole duration, so a load,
/// mutate, save sequence from one job can never overwrite another's.
pub struct JobStore {
    inner: Mutex<StoreInner>,
}

impl JobStore {
    /// Wraps a table backend
    pub fn new(table: impl JobTable + 'static) -> Self {
        tracing::debug!("Using job table {}", table.describe());
        Self {
            inner: Mutex::new(StoreInner {
                table: Box::new(table),
                active: HashMap::new(),
            }),
        }
    }

    /// Opens the JSON table in `data_dir`
    pub fn open_json(data_dir: &Path) -> StoreResult<Self> {
        Ok(Self::new(JsonJobTable::open(data_dir)?))
    }

    /// Opens the SQLite table in `data_dir`
    pub fn open_sqlite(data_dir: &Path) -> StoreResult<Self> {
        Ok(Self::new(SqliteJobTable::open(data_dir)?))
    }

    /// Opens the backend selected in the settings
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deadlink_crawler::config::Settings;
    /// use deadlink_crawler::storage::JobStore;
    ///
    /// let store = JobStore::open(&Settings::default().storage).unwrap();
    /// let recent = store.list(10).unwrap();
    /// ```
    pub fn open(settings: &StorageSettings) -> StoreResult<Self> {
        match settings.backend {
            StorageBackend::Json => Self::open_json(&settings.data_dir),
            StorageBackend::Sqlite => Self::open_sqlite(&settings.data_dir),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persists a new job and caches it as active
    pub fn create(&self, job: Job) -> StoreResult<Job> {
        let mut inner = self.lock();

        let mut jobs = inner.table.load()?;
        jobs.insert(job.id.clone(), job.clone());
        inner.table.save(&jobs)?;

        inner.active.insert(job.id.clone(), job.clone());
        tracing::debug!("Created job {}", job.id);
        Ok(job)
    }

    /// Looks up a job, active cache first
    pub fn get(&self, id: &str) -> StoreResult<Option<Job>> {
        let inner = self.lock();

        if let Some(job) = inner.active.get(id) {
            return Ok(Some(job.clone()));
        }

        Ok(inner.table.load()?.remove(id))
    }

    /// Looks up a job that must exist
    pub fn require(&self, id: &str) -> StoreResult<Job> {
        self.get(id)?
            .ok_or_else(|| StoreError::JobNotFound(id.to_string()))
    }

    /// Current status of a job
    pub fn status(&self, id: &str) -> StoreResult<JobStatus> {
        Ok(self.require(id)?.status)
    }

    /// Lists up to `limit` jobs, newest first
    pub fn list(&self, limit: usize) -> StoreResult<Vec<Job>> {
        let inner = self.lock();

        let mut jobs: Vec<Job> = inner.table.load()?.into_values().collect();
        jobs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        jobs.truncate(limit);

        Ok(jobs)
    }

    /// Merges a partial update into a stored job
    ///
    /// # Returns
    ///
    /// * `Ok(Job)` - The merged record
    /// * `Err(StoreError::JobNotFound)` - No job has this id
    /// * `Err(StoreError::InvalidState)` - The update breaks the job state machine
    pub fn update(&self, id: &str, update: JobUpdate) -> StoreResult<Job> {
        let mut inner = self.lock();

        let mut jobs = inner.table.load()?;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::JobNotFound(id.to_string()))?;
        job.apply(update)?;
        let job = job.clone();

        inner.table.save(&jobs)?;

        if job.status.is_terminal() {
            inner.active.remove(id);
        } else {
            inner.active.insert(job.id.clone(), job.clone());
        }

        Ok(job)
    }

    /// Number of jobs currently cached as active
    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }
}
