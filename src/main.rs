//! Deadlink Crawler main entry point
//!
//! This is the command-line interface for running crawl jobs and inspecting
//! jobs, saved configurations and reports.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use deadlink_crawler::config::{
    default_config, load_crawl_config, load_settings_with_hash, ConfigProvider, ConfigStore,
    CrawlConfig, Settings,
};
use deadlink_crawler::output::{list_reports, print_configs, print_job, print_jobs, print_reports};
use deadlink_crawler::{JobStatus, JobStore, Orchestrator};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Settings file picked up from the working directory when `--settings` is absent
const DEFAULT_SETTINGS_FILE: &str = "deadlink.toml";

const WAIT_POLL: Duration = Duration::from_millis(250);

/// Deadlink Crawler: find dead links across a website
///
/// Crawls every page reachable from a start URL on the same site, checks
/// each link it finds, and writes the dead ones to a CSV report.
#[derive(Parser, Debug)]
#[command(name = "deadlink-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Same-site dead link crawler", long_about = None)]
struct Cli {
    /// Path to the TOML settings file
    #[arg(short, long, value_name = "SETTINGS", global = true)]
    settings: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a crawl job and wait for it to finish
    Crawl(CrawlArgs),

    /// List recent jobs
    Jobs {
        /// Maximum number of jobs to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one job
    Job { id: String },

    /// Cancel a queued or running job
    Cancel { id: String },

    /// List saved crawl configurations
    Configs,

    /// Print a saved crawl configuration
    Config { id: String },

    /// Save a new crawl configuration
    ConfigNew {
        id: String,

        /// JSON configuration to save; the built-in template when absent
        #[arg(long)]
        from: Option<PathBuf>,

        /// Start URL to set on the new configuration
        #[arg(long)]
        url: Option<String>,
    },

    /// Replace a saved crawl configuration with a JSON file
    ConfigSet { id: String, path: PathBuf },

    /// Delete a saved crawl configuration
    ConfigDelete { id: String },

    /// List CSV reports, newest first
    Reports {
        /// Report directory
        #[arg(long, default_value = "reports")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct CrawlSource {
    /// Id of a saved configuration
    #[arg(long)]
    config_id: Option<String>,

    /// Path to a JSON crawl configuration
    #[arg(long)]
    config_path: Option<PathBuf>,

    /// Start URL, with every other option defaulted
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    #[command(flatten)]
    source: CrawlSource,

    /// Override the maximum crawl depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Override the report directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Command::Crawl(args) => handle_crawl(&settings, args).await,
        Command::Jobs { limit } => {
            let store = JobStore::open(&settings.storage)?;
            let jobs = store.list(limit.unwrap_or(settings.jobs.list_limit))?;
            print_jobs(&mut io::stdout(), &jobs)?;
            Ok(())
        }
        Command::Job { id } => {
            let store = JobStore::open(&settings.storage)?;
            let job = store.require(&id)?;
            print_job(&mut io::stdout(), &job)?;
            Ok(())
        }
        Command::Cancel { id } => {
            let orchestrator = Orchestrator::new(Arc::new(JobStore::open(&settings.storage)?), &settings);
            let job = orchestrator.cancel(&id)?;
            println!("Job {} is {}", job.id, job.status);
            Ok(())
        }
        Command::Configs => {
            let configs = ConfigStore::new(&settings.configs.dir).list()?;
            print_configs(&mut io::stdout(), &configs)?;
            Ok(())
        }
        Command::Config { id } => {
            let config = ConfigStore::new(&settings.configs.dir).get(&id)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::ConfigNew { id, from, url } => {
            let mut config = match from {
                Some(path) => load_crawl_config(&path)?,
                None => default_config(),
            };
            if let Some(url) = url {
                config.start_url = Some(url);
            }
            ConfigStore::new(&settings.configs.dir).create(&id, config)?;
            println!("Saved configuration {}", id);
            Ok(())
        }
        Command::ConfigSet { id, path } => {
            let config = load_crawl_config(&path)?;
            ConfigStore::new(&settings.configs.dir).update(&id, config)?;
            println!("Updated configuration {}", id);
            Ok(())
        }
        Command::ConfigDelete { id } => {
            ConfigStore::new(&settings.configs.dir).delete(&id)?;
            println!("Deleted configuration {}", id);
            Ok(())
        }
        Command::Reports { dir } => {
            let reports = list_reports(&dir)?;
            print_reports(&mut io::stdout(), &reports)?;
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("deadlink_crawler=info,warn"),
            1 => EnvFilter::new("deadlink_crawler=debug,info"),
            2 => EnvFilter::new("deadlink_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads settings from `--settings`, then `deadlink.toml`, then defaults
fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None if Path::new(DEFAULT_SETTINGS_FILE).exists() => PathBuf::from(DEFAULT_SETTINGS_FILE),
        None => {
            tracing::debug!("No settings file, using defaults");
            return Ok(Settings::default());
        }
    };

    tracing::info!("Loading settings from: {}", path.display());
    let (settings, hash) = load_settings_with_hash(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    tracing::info!("Settings loaded successfully (hash: {})", hash);

    Ok(settings)
}

/// Resolves the crawl configuration named on the command line
fn resolve_crawl_config(
    settings: &Settings,
    args: &CrawlArgs,
) -> anyhow::Result<(CrawlConfig, Option<String>)> {
    let (mut config, config_id) = if let Some(id) = &args.source.config_id {
        let store = ConfigStore::new(&settings.configs.dir);
        (store.get(id)?, Some(id.clone()))
    } else if let Some(path) = &args.source.config_path {
        (load_crawl_config(path)?, None)
    } else if let Some(url) = &args.source.url {
        (CrawlConfig::for_url(url), None)
    } else {
        bail!("One of --config-id, --config-path or --url is required");
    };

    if let Some(max_depth) = args.max_depth {
        config.max_depth = Some(max_depth);
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }

    Ok((config, config_id))
}

/// Handles the crawl command: submit a job, wait, print the outcome
///
/// Ctrl-C cancels the job; the crawl stops at its next progress event and
/// still writes a report for what it found.
async fn handle_crawl(settings: &Settings, args: CrawlArgs) -> anyhow::Result<()> {
    let (config, config_id) = resolve_crawl_config(settings, &args)?;

    let store = Arc::new(JobStore::open(&settings.storage)?);
    let orchestrator = Orchestrator::new(store, settings);

    let (id, mut handle) = orchestrator.submit(config, config_id)?;
    println!("Job {} started", id);

    let interrupted = tokio::select! {
        result = &mut handle => {
            result.context("Job task failed")?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        tracing::warn!("Interrupted, cancelling job {}", id);
        if let Err(e) = orchestrator.cancel(&id) {
            tracing::warn!("Could not cancel job {}: {}", id, e);
        }
        handle.await.context("Job task failed")?;
    }

    let job = orchestrator.wait(&id, WAIT_POLL).await?;
    println!();
    print_job(&mut io::stdout(), &job)?;

    if job.status == JobStatus::Failed {
        bail!(
            "Job {} failed: {}",
            job.id,
            job.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
