//! Deadlink Crawler: a same-site dead link checker
//!
//! This crate walks every page reachable from a seed URL within one site,
//! classifies each discovered link against domain-specific exception rules,
//! and records dead links in a CSV report. Crawls run as persisted jobs with
//! live progress and cooperative cancellation.

pub mod config;
pub mod crawler;
pub mod jobs;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum DeadlinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("start_url is required in config")]
    MissingStartUrl,

    #[error("Invalid start URL '{url}': {reason}")]
    InvalidStartUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Report error: {0}")]
    Report(#[from] output::ReportError),

    #[error("Job store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration '{0}' not found")]
    NotFound(String),

    #[error("Configuration '{0}' already exists")]
    AlreadyExists(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, DeadlinkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CrawlConfig, DomainRule, Settings};
pub use crawler::{run_crawl, CrawlOutcome, CrawlReport, LinkVerdict, ProgressEvent, ProgressSink};
pub use jobs::Orchestrator;
pub use state::{Job, JobStatus};
pub use storage::JobStore;
