//! Storage traits and error types
//!
//! This module defines the trait interface for job table backends and
//! associated error types.

use crate::state::{Job, JobStatus};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during job storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job {job_id} is {status} and cannot {action}")]
    InvalidState {
        job_id: String,
        status: JobStatus,
        action: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// The whole job table, keyed by job id
pub type JobMap = BTreeMap<String, Job>;

/// A persisted job table
///
/// The table is always read and written whole; callers hold the store lock
/// across a `load`/`save` pair so concurrent jobs never lose updates.
pub trait JobTable: Send {
    /// Loads every job; a missing table is empty, a corrupt one is an error
    fn load(&self) -> StoreResult<JobMap>;

    /// Replaces the persisted table with `jobs`
    fn save(&mut self, jobs: &JobMap) -> StoreResult<()>;

    /// Short name for logs
    fn describe(&self) -> String;
}
