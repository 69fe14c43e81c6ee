//! Output module for crawl reports and summaries
//!
//! This module handles:
//! - Writing dead links to CSV reports and reading them back
//! - Listing report files
//! - Rendering job, configuration and report summaries for the terminal

mod report;
pub mod stats;

pub use report::{
    list_reports, read_report, report_filename, write_report, ErrorRecord, ReportError,
    ReportFile,
};
pub use stats::{print_configs, print_job, print_jobs, print_reports};
