//! CSV failure reports
//!
//! One report file per crawl, written only when the crawl found dead links.
//! Columns are fixed: `error_type, link_url, link_text, source_page`.

use crate::url::domain_slug;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing or reading reports
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One dead link found during a crawl
///
/// Field order is the report column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// The verdict message, e.g. `HTTP 404`
    pub error_type: String,
    pub link_url: String,
    pub link_text: String,
    /// Page the link was found on
    pub source_page: String,
}

/// A report file on disk
#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Local>,
}

/// Builds the report file name for a crawl
///
/// # Example
///
/// ```
/// use chrono::{Local, TimeZone};
/// use deadlink_crawler::output::report_filename;
///
/// let started = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(
///     report_filename("www.example.com", &started),
///     "dead_links_report_example_com_20240309_140507.csv"
/// );
/// ```
pub fn report_filename(domain: &str, started_at: &DateTime<Local>) -> String {
    format!(
        "dead_links_report_{}_{}.csv",
        domain_slug(domain),
        started_at.format("%Y%m%d_%H%M%S")
    )
}

/// Writes the error list to a new CSV report
///
/// # Arguments
///
/// * `output_dir` - Directory for the report, created if missing
/// * `domain` - Seed host, used in the file name
/// * `started_at` - Crawl start time, used in the file name
/// * `errors` - Records to write
///
/// # Returns
///
/// * `Ok(Some(path))` - The report was written
/// * `Ok(None)` - `errors` was empty; nothing was written
/// * `Err(ReportError)` - The file could not be written
pub fn write_report(
    output_dir: &Path,
    domain: &str,
    started_at: &DateTime<Local>,
    errors: &[ErrorRecord],
) -> Result<Option<PathBuf>, ReportError> {
    if errors.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_filename(domain, started_at));

    let mut writer = csv::Writer::from_path(&path)?;
    for record in errors {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} dead links to {}", errors.len(), path.display());
    Ok(Some(path))
}

/// Reads a report back into records
pub fn read_report(path: &Path) -> Result<Vec<ErrorRecord>, ReportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader.deserialize().collect::<Result<Vec<ErrorRecord>, _>>()?;
    Ok(records)
}

/// Lists `.csv` reports in a directory, newest first
///
/// A missing directory yields an empty list.
pub fn list_reports(dir: &Path) -> Result<Vec<ReportFile>, ReportError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut reports = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        reports.push(ReportFile {
            filename: entry.file_name().to_string_lossy().into_owned(),
            path,
            size: metadata.len(),
            modified: DateTime::<Local>::from(metadata.modified()?),
        });
    }

    reports.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.filename.cmp(&a.filename))
    });

    Ok(reports)
}
