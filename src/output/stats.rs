//! Terminal summaries for jobs, configurations and reports
//!
//! These render to any `io::Write` so the CLI prints to stdout and tests
//! render into a buffer.

use crate::config::ConfigSummary;
use crate::output::ReportFile;
use crate::state::Job;
use std::io::{self, Write};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prints one line per job
pub fn print_jobs(out: &mut impl Write, jobs: &[Job]) -> io::Result<()> {
    if jobs.is_empty() {
        writeln!(out, "No jobs found")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<36}  {:<9}  {:<19}  {:>6}  {:>6}  {:>6}  START URL",
        "ID", "STATUS", "CREATED", "PAGES", "LINKS", "ERRORS"
    )?;

    for job in jobs {
        writeln!(
            out,
            "{:<36}  {:<9}  {:<19}  {:>6}  {:>6}  {:>6}  {}",
            job.id,
            job.status,
            job.created_at.format(TIME_FORMAT),
            job.stats.pages_crawled,
            job.stats.links_checked,
            job.stats.errors_found,
            job.config.start_url.as_deref().unwrap_or("-")
        )?;
    }

    Ok(())
}

/// Prints every field of a job
pub fn print_job(out: &mut impl Write, job: &Job) -> io::Result<()> {
    writeln!(out, "Job:           {}", job.id)?;
    writeln!(out, "Status:        {}", job.status)?;
    writeln!(
        out,
        "Start URL:     {}",
        job.config.start_url.as_deref().unwrap_or("-")
    )?;
    if let Some(config_id) = &job.config_id {
        writeln!(out, "Config:        {}", config_id)?;
    }
    writeln!(out, "Created:       {}", job.created_at.format(TIME_FORMAT))?;
    if let Some(started) = job.started_at {
        writeln!(out, "Started:       {}", started.format(TIME_FORMAT))?;
    }
    if let Some(completed) = job.completed_at {
        writeln!(out, "Completed:     {}", completed.format(TIME_FORMAT))?;
        if let Some(started) = job.started_at {
            let seconds = (completed - started).num_seconds();
            writeln!(out, "Duration:      {}s", seconds.max(0))?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Pages crawled: {}", job.stats.pages_crawled)?;
    writeln!(out, "Links checked: {}", job.stats.links_checked)?;
    writeln!(out, "Errors found:  {}", job.stats.errors_found)?;

    match &job.report_path {
        Some(path) => writeln!(out, "Report:        {}", path.display())?,
        None if job.status.is_terminal() => {
            writeln!(out, "Report:        none (no dead links found)")?
        }
        None => {}
    }

    if let Some(error) = &job.error {
        writeln!(out, "Error:         {}", error)?;
    }

    Ok(())
}

/// Prints saved configuration summaries
pub fn print_configs(out: &mut impl Write, configs: &[ConfigSummary]) -> io::Result<()> {
    if configs.is_empty() {
        writeln!(out, "No saved configurations")?;
        return Ok(());
    }

    for config in configs {
        writeln!(
            out,
            "{:<24}  {:<32}  {}",
            config.id,
            config.name,
            if config.start_url.is_empty() {
                "-"
            } else {
                config.start_url.as_str()
            }
        )?;
    }

    Ok(())
}

/// Prints report files, in the order given
pub fn print_reports(out: &mut impl Write, reports: &[ReportFile]) -> io::Result<()> {
    if reports.is_empty() {
        writeln!(out, "No reports found")?;
        return Ok(());
    }

    for report in reports {
        writeln!(
            out,
            "{}  {:>9} B  {}",
            report.modified.format(TIME_FORMAT),
            report.size,
            report.filename
        )?;
    }

    Ok(())
}
