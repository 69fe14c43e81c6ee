//! Crawler module for dead link detection
//!
//! This module contains the core crawling logic, including:
//! - Link classification (HEAD with GET fallback, domain rules, whitelist)
//! - HTML parsing and anchor extraction
//! - The breadth-first frontier and request pacing
//! - The crawl loop, its progress events and cancellation

mod classifier;
mod coordinator;
mod events;
mod fetcher;
mod parser;
mod scheduler;

pub use classifier::{LinkClassifier, LinkVerdict};
pub use coordinator::{run_crawl, CrawlOutcome, CrawlReport, Crawler};
pub use events::{CrawlStats, NullSink, ProgressEvent, ProgressSink};
pub use fetcher::{build_http_client, fetch_page, PageFetch};
pub use parser::{extract_links, ExtractedLink, NO_TEXT_PLACEHOLDER};
pub use scheduler::{Frontier, Pacer, QueuedPage};
