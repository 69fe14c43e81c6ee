//! Configuration module for the dead link crawler
//!
//! Two kinds of configuration live here:
//! - `Settings`: process-wide TOML settings (job storage, config directory, HTTP identity)
//! - `CrawlConfig`: the per-run JSON document describing what to crawl and how to judge links
//!
//! # Example
//!
//! ```no_run
//! use deadlink_crawler::config::{load_settings, parse_crawl_config};
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("deadlink.toml")).unwrap();
//! let crawl = parse_crawl_config(r#"{"start_url": "https://example.com"}"#).unwrap();
//! println!("{} -> {:?}", settings.http.user_agent, crawl.start_url);
//! ```

mod parser;
mod rules;
mod store;
mod types;
mod validation;

// Re-export types
pub use types::{
    ConfigStoreSettings, CrawlConfig, DomainRule, HttpSettings, JobSettings, Settings,
    StorageBackend, StorageSettings,
};

// Re-export parser functions
pub use parser::{
    compute_settings_hash, load_crawl_config, load_settings, load_settings_with_hash,
    parse_crawl_config,
};

pub use rules::{default_domain_rules, merge_domain_rules};
pub use store::{default_config, ConfigProvider, ConfigStore, ConfigSummary};
pub use validation::require_start_url;
