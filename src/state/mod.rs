//! State module for tracking crawl jobs
//!
//! # Components
//!
//! - `JobStatus`: The job lifecycle (queued, running, completed, failed, cancelled)
//! - `Job`: The persisted job record
//! - `JobUpdate`: A partial update merged into a job under the state machine rules

mod job;
mod job_state;

// Re-export main types
pub use job::{Job, JobUpdate};
pub use job_state::JobStatus;
