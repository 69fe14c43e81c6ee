use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Duration;

/// Service-level settings for the crawler process
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub configs: ConfigStoreSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub jobs: JobSettings,
}

/// Which persisted table backs the job store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

/// Job store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the persisted job table
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Persisted table format
    #[serde(default)]
    pub backend: StorageBackend,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: StorageBackend::default(),
        }
    }
}

/// Location of the named crawl configuration documents
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigStoreSettings {
    #[serde(default = "default_config_dir")]
    pub dir: PathBuf,
}

impl Default for ConfigStoreSettings {
    fn default() -> Self {
        Self {
            dir: default_config_dir(),
        }
    }
}

/// HTTP client identification and redirect policy
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirect hops followed before giving up
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Job orchestration tuning
#[derive(Debug, Clone, Deserialize)]
pub struct JobSettings {
    /// Persist a stats snapshot every N checked links
    #[serde(
        rename = "stats-flush-interval",
        default = "default_stats_flush_interval"
    )]
    pub stats_flush_interval: u32,

    /// Default number of jobs returned by a listing
    #[serde(rename = "list-limit", default = "default_list_limit")]
    pub list_limit: usize,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            stats_flush_interval: default_stats_flush_interval(),
            list_limit: default_list_limit(),
        }
    }
}

/// Per-domain policy overriding the default error classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    /// Status codes that are not errors for this domain
    pub allowed_codes: BTreeSet<u16>,

    /// Human-readable reason, used in verdict messages
    pub description: String,

    /// Treat request timeouts against this domain as non-errors
    #[serde(default)]
    pub ignore_timeouts: bool,
}

impl DomainRule {
    pub fn new(codes: impl IntoIterator<Item = u16>, description: &str) -> Self {
        Self {
            allowed_codes: codes.into_iter().collect(),
            description: description.to_string(),
            ignore_timeouts: false,
        }
    }
}

/// Input for one crawl run
///
/// Fields the crawler does not understand (`name`, `id`, ...) are kept in
/// `extra` so a job's config snapshot round-trips intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlConfig {
    #[serde(default)]
    pub start_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: f64,

    /// Pause after each link check, in seconds
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Maximum page depth from the seed; `None` is unlimited
    #[serde(default)]
    pub max_depth: Option<u32>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub show_skipped_links: bool,

    /// Status codes treated as "access restricted" rather than dead
    #[serde(default = "default_whitelist_codes")]
    pub whitelist_codes: BTreeSet<u16>,

    /// User rules keyed by domain; merged over the built-in defaults
    #[serde(default)]
    pub domain_rules: BTreeMap<String, DomainRule>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CrawlConfig {
    /// Creates a config for the given seed with every other field defaulted
    pub fn for_url(start_url: &str) -> Self {
        Self {
            start_url: Some(start_url.to_string()),
            ..Self::default()
        }
    }

    /// Request timeout, falling back to the default for unusable values
    pub fn timeout_duration(&self) -> Duration {
        positive_secs(self.timeout).unwrap_or_else(|| Duration::from_secs_f64(default_timeout()))
    }

    /// Inter-request delay; zero disables pacing
    pub fn delay_duration(&self) -> Duration {
        if self.delay == 0.0 {
            return Duration::ZERO;
        }
        positive_secs(self.delay).unwrap_or_else(|| Duration::from_secs_f64(default_delay()))
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: None,
            timeout: default_timeout(),
            delay: default_delay(),
            max_depth: None,
            output_dir: default_output_dir(),
            show_skipped_links: false,
            whitelist_codes: default_whitelist_codes(),
            domain_rules: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }
}

fn positive_secs(secs: f64) -> Option<Duration> {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".data")
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("custom_config_json")
}

fn default_user_agent() -> String {
    "DeadLinkChecker/1.0 (Rust)".to_string()
}

fn default_max_redirects() -> usize {
    30
}

fn default_stats_flush_interval() -> u32 {
    5
}

fn default_list_limit() -> usize {
    50
}

fn default_timeout() -> f64 {
    10.0
}

fn default_delay() -> f64 {
    0.5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_whitelist_codes() -> BTreeSet<u16> {
    [403, 999].into_iter().collect()
}
