//! Crawler coordinator - main crawl loop
//!
//! Drives one breadth-first crawl from a seed URL:
//! - Pops pages from the frontier and fetches them
//! - Classifies every link found, checking each distinct URL once per crawl
//! - Follows same-site links, within the depth limit
//! - Reports progress to a sink, which can also cancel the crawl
//! - Writes the dead-link report when the loop ends, cancelled or not

use crate::config::{require_start_url, CrawlConfig, HttpSettings};
use crate::crawler::classifier::LinkClassifier;
use crate::crawler::events::{CrawlStats, ProgressEvent, ProgressSink};
use crate::crawler::fetcher::{build_http_client, fetch_page, PageFetch};
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::{Frontier, Pacer, QueuedPage};
use crate::output::{write_report, ErrorRecord};
use crate::url::is_internal;
use crate::DeadlinkError;
use chrono::{DateTime, Local};
use reqwest::Client;
use std::collections::HashSet;
use std::path::PathBuf;
use url::Url;

/// What a finished crawl produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Present only when dead links were found
    pub report_path: Option<PathBuf>,
    pub stats: CrawlStats,
}

/// How a crawl ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The frontier was exhausted
    Completed(CrawlReport),

    /// The sink asked to stop; the report covers the work done so far
    Cancelled(CrawlReport),
}

impl CrawlOutcome {
    pub fn report(&self) -> &CrawlReport {
        match self {
            Self::Completed(report) | Self::Cancelled(report) => report,
        }
    }

    pub fn into_report(self) -> CrawlReport {
        match self {
            Self::Completed(report) | Self::Cancelled(report) => report,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Raised internally when the sink reports cancellation
struct Cancelled;

/// Emits an event unless the sink has been cancelled
fn notify<S: ProgressSink>(sink: &mut S, event: ProgressEvent) -> Result<(), Cancelled> {
    if sink.is_cancelled() {
        return Err(Cancelled);
    }
    sink.emit(&event);
    Ok(())
}

/// State of one crawl run
pub struct Crawler {
    config: CrawlConfig,
    seed: Url,
    /// Seed host with its port, if any
    domain: String,
    client: Client,
    classifier: LinkClassifier,
    frontier: Frontier,
    pacer: Pacer,
    checked_links: HashSet<String>,
    errors: Vec<ErrorRecord>,
    links_checked: u64,
    started_at: DateTime<Local>,
}

impl Crawler {
    /// Creates a crawler for the given configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration; `start_url` is required
    /// * `http` - Process-wide HTTP identity and redirect limit
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(DeadlinkError)` - Missing or invalid start URL, or the HTTP client could not be built
    pub fn new(config: &CrawlConfig, http: &HttpSettings) -> Result<Self, DeadlinkError> {
        let seed = require_start_url(config)?;

        let domain = match (seed.host_str(), seed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };

        let client = build_http_client(http, config.timeout_duration())?;
        let classifier = LinkClassifier::new(config, client.clone());

        Ok(Self {
            config: config.clone(),
            frontier: Frontier::new(seed.clone(), config.max_depth),
            pacer: Pacer::new(config.delay_duration()),
            seed,
            domain,
            client,
            classifier,
            checked_links: HashSet::new(),
            errors: Vec::new(),
            links_checked: 0,
            started_at: Local::now(),
        })
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// The report is written in both cases. Only a report write failure is
    /// returned as an error.
    pub async fn run<S: ProgressSink>(mut self, sink: &mut S) -> Result<CrawlOutcome, DeadlinkError> {
        tracing::info!("Starting crawl of {}", self.seed);

        let cancelled = self.walk(sink).await.is_err();

        let report_path = write_report(
            &self.config.output_dir,
            &self.domain,
            &self.started_at,
            &self.errors,
        )?;

        let report = CrawlReport {
            report_path,
            stats: self.stats(),
        };

        if cancelled {
            tracing::info!(
                "Crawl of {} cancelled after {} pages",
                self.seed,
                report.stats.pages_crawled
            );
            Ok(CrawlOutcome::Cancelled(report))
        } else {
            tracing::info!(
                "Crawl of {} complete: {} pages, {} links, {} errors",
                self.seed,
                report.stats.pages_crawled,
                report.stats.links_checked,
                report.stats.errors_found
            );
            Ok(CrawlOutcome::Completed(report))
        }
    }

    fn stats(&self) -> CrawlStats {
        CrawlStats {
            pages_crawled: self.frontier.pages_crawled(),
            links_checked: self.links_checked,
            errors_found: self.errors.len() as u64,
        }
    }

    async fn walk<S: ProgressSink>(&mut self, sink: &mut S) -> Result<(), Cancelled> {
        notify(
            sink,
            ProgressEvent::Start {
                start_url: self.seed.to_string(),
                domain: self.domain.clone(),
                max_depth: self.config.max_depth,
            },
        )?;

        while let Some(page) = self.frontier.next_page() {
            tracing::debug!(
                "Crawling {} (depth {}, {} pages queued)",
                page.url,
                page.depth,
                self.frontier.pending()
            );

            notify(
                sink,
                ProgressEvent::PageCrawled {
                    url: page.url.to_string(),
                    stats: self.stats(),
                },
            )?;

            self.crawl_page(&page, sink).await?;
        }

        notify(sink, ProgressEvent::Complete { stats: self.stats() })
    }

    async fn crawl_page<S: ProgressSink>(
        &mut self,
        page: &QueuedPage,
        sink: &mut S,
    ) -> Result<(), Cancelled> {
        let body = match fetch_page(&self.client, &page.url).await {
            PageFetch::Body(body) => body,
            PageFetch::Status(status_code) => {
                tracing::debug!("Page {} answered {}", page.url, status_code);
                return notify(
                    sink,
                    ProgressEvent::Warning {
                        url: page.url.to_string(),
                        status_code,
                    },
                );
            }
            PageFetch::Failed(error) => {
                tracing::debug!("Page {} failed: {}", page.url, error);
                return notify(
                    sink,
                    ProgressEvent::Error {
                        url: page.url.to_string(),
                        error_type: format!("Crawl error: {}", error),
                    },
                );
            }
        };

        let links = extract_links(&body, &page.url);
        notify(
            sink,
            ProgressEvent::Info {
                message: format!("Found {} links on this page", links.len()),
            },
        )?;

        let mut checked = 0u64;
        let mut skipped = 0u64;

        for link in links {
            if sink.is_cancelled() {
                return Err(Cancelled);
            }

            let key = link.url.to_string();

            if !self.checked_links.insert(key.clone()) {
                skipped += 1;
                if self.config.show_skipped_links {
                    notify(
                        sink,
                        ProgressEvent::Info {
                            message: format!("Skipped (already checked): {}", key),
                        },
                    )?;
                }
                continue;
            }

            checked += 1;
            self.links_checked += 1;

            let verdict = self.classifier.classify(&key).await;

            if verdict.is_error {
                let error_type = verdict.message_or_empty().to_string();
                self.errors.push(ErrorRecord {
                    error_type: error_type.clone(),
                    link_url: key.clone(),
                    link_text: link.text.clone(),
                    source_page: page.url.to_string(),
                });
                notify(sink, ProgressEvent::Error { url: key, error_type })?;
            } else if let (true, Some(status_code)) = (verdict.is_redirect(), verdict.status_code) {
                notify(sink, ProgressEvent::Warning { url: key, status_code })?;
            } else {
                notify(sink, ProgressEvent::Success { url: key })?;
            }

            notify(sink, ProgressEvent::LinkChecked { stats: self.stats() })?;

            if is_internal(&link.url, &self.seed) {
                self.frontier.enqueue(link.url, page.depth + 1);
            }

            self.pacer.pause().await;
        }

        if self.config.show_skipped_links && skipped > 0 {
            notify(
                sink,
                ProgressEvent::Info {
                    message: format!(
                        "Summary: {} checked, {} skipped (already checked)",
                        checked, skipped
                    ),
                },
            )?;
        }

        Ok(())
    }
}

/// Runs a complete crawl
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `http` - HTTP identity and redirect limit
/// * `sink` - Receives progress events and may cancel the crawl
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl completed or was cancelled
/// * `Err(DeadlinkError)` - The crawl could not start, or its report could not be written
///
/// # Example
///
/// ```no_run
/// use deadlink_crawler::config::{CrawlConfig, HttpSettings};
/// use deadlink_crawler::crawler::{run_crawl, ProgressEvent};
///
/// # async fn example() -> deadlink_crawler::Result<()> {
/// let config = CrawlConfig::for_url("https://example.com");
/// let mut sink = |event: &ProgressEvent| println!("{}", event.kind());
/// let outcome = run_crawl(&config, &HttpSettings::default(), &mut sink).await?;
/// println!("{:?}", outcome.report().report_path);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<S: ProgressSink>(
    config: &CrawlConfig,
    http: &HttpSettings,
    sink: &mut S,
) -> Result<CrawlOutcome, DeadlinkError> {
    Crawler::new(config, http)?.run(sink).await
}
