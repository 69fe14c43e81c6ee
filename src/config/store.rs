//! Directory-backed store of named crawl configurations
//!
//! Each configuration is a pretty-printed JSON document `<id>.json` inside
//! the store directory. Crawls resolve saved configurations through
//! [`ConfigProvider::get`]; the `configs`, `config-new`, `config-set` and
//! `config-delete` commands cover the rest.

use crate::config::types::{CrawlConfig, DomainRule};
use crate::{ConfigError, ConfigResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Source of crawl configurations by id
pub trait ConfigProvider {
    /// Fetches a configuration, failing with `ConfigError::NotFound` if absent
    fn get(&self, id: &str) -> ConfigResult<CrawlConfig>;
}

/// Listing entry for a stored configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSummary {
    pub id: String,
    pub name: String,
    pub start_url: String,
}

/// Configuration documents stored as JSON files in one directory
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn ensure_dir(&self) -> ConfigResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Lists all readable configurations, sorted by id
    ///
    /// Documents that fail to parse are skipped.
    pub fn list(&self) -> ConfigResult<Vec<ConfigSummary>> {
        self.ensure_dir()?;

        let mut configs = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match self.get(id) {
                Ok(config) => configs.push(ConfigSummary {
                    id: id.to_string(),
                    name: config
                        .extra
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or(id)
                        .to_string(),
                    start_url: config.start_url.unwrap_or_default(),
                }),
                Err(e) => {
                    tracing::debug!("Skipping unreadable config {}: {}", path.display(), e);
                }
            }
        }

        configs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(configs)
    }

    /// Creates a new configuration; fails if the id is taken
    pub fn create(&self, id: &str, mut config: CrawlConfig) -> ConfigResult<CrawlConfig> {
        self.ensure_dir()?;
        let path = self.path_for(id);

        if path.exists() {
            return Err(ConfigError::AlreadyExists(id.to_string()));
        }

        config
            .extra
            .insert("id".to_string(), serde_json::Value::String(id.to_string()));
        self.write(&path, &config)?;
        Ok(config)
    }

    /// Replaces an existing configuration
    pub fn update(&self, id: &str, mut config: CrawlConfig) -> ConfigResult<CrawlConfig> {
        let path = self.path_for(id);

        if !path.exists() {
            return Err(ConfigError::NotFound(id.to_string()));
        }

        config
            .extra
            .insert("id".to_string(), serde_json::Value::String(id.to_string()));
        self.write(&path, &config)?;
        Ok(config)
    }

    /// Deletes a configuration
    pub fn delete(&self, id: &str) -> ConfigResult<()> {
        let path = self.path_for(id);

        if !path.exists() {
            return Err(ConfigError::NotFound(id.to_string()));
        }

        std::fs::remove_file(path)?;
        Ok(())
    }

    fn write(&self, path: &Path, config: &CrawlConfig) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl ConfigProvider for ConfigStore {
    fn get(&self, id: &str) -> ConfigResult<CrawlConfig> {
        let path = self.path_for(id);

        if !path.exists() {
            return Err(ConfigError::NotFound(id.to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Template for a new configuration document
pub fn default_config() -> CrawlConfig {
    let mut config = CrawlConfig::for_url("https://example.com");
    config.timeout = 15.0;
    config.extra.insert(
        "name".to_string(),
        serde_json::Value::String("New Configuration".to_string()),
    );

    let mut rules = BTreeMap::new();
    rules.insert(
        "linkedin.com".to_string(),
        DomainRule::new([999, 429], "LinkedIn rate limiting"),
    );
    rules.insert(
        "twitter.com".to_string(),
        DomainRule::new([403], "Twitter access restriction"),
    );
    rules.insert(
        "x.com".to_string(),
        DomainRule::new([403], "X/Twitter access restriction"),
    );
    config.domain_rules = rules;
    config
}
