//! Progress events emitted by a crawl and the sink contract that receives them

use serde::{Deserialize, Serialize};

/// Running totals for one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub pages_crawled: u64,
    pub links_checked: u64,
    pub errors_found: u64,
}

/// A single progress notification
///
/// Serializes as `{"type": "<tag>", ...payload}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Start {
        start_url: String,
        domain: String,
        max_depth: Option<u32>,
    },
    PageCrawled {
        url: String,
        #[serde(flatten)]
        stats: CrawlStats,
    },
    /// A page answered with a non-200 status, or a link redirected
    Warning { url: String, status_code: u16 },
    /// A dead link, or a page that could not be fetched at all
    Error { url: String, error_type: String },
    Success { url: String },
    Info { message: String },
    LinkChecked {
        #[serde(flatten)]
        stats: CrawlStats,
    },
    Complete {
        #[serde(flatten)]
        stats: CrawlStats,
    },
}

impl ProgressEvent {
    /// The event-type tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::PageCrawled { .. } => "page_crawled",
            Self::Warning { .. } => "warning",
            Self::Error { .. } => "error",
            Self::Success { .. } => "success",
            Self::Info { .. } => "info",
            Self::LinkChecked { .. } => "link_checked",
            Self::Complete { .. } => "complete",
        }
    }

    /// Stats snapshot carried by this event, if any
    pub fn stats(&self) -> Option<&CrawlStats> {
        match self {
            Self::PageCrawled { stats, .. }
            | Self::LinkChecked { stats }
            | Self::Complete { stats } => Some(stats),
            _ => None,
        }
    }
}

/// Receiver of crawl progress
///
/// The crawl asks `is_cancelled` before every emission and before each link
/// check; once it answers `true` the crawl stops emitting and finishes with a
/// cancelled outcome.
pub trait ProgressSink: Send {
    fn emit(&mut self, event: &ProgressEvent);

    fn is_cancelled(&mut self) -> bool {
        false
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressEvent) + Send,
{
    fn emit(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _event: &ProgressEvent) {}
}
