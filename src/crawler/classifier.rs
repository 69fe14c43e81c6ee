//! Link classification
//!
//! Decides whether a single link is dead. Each link gets a HEAD request that
//! follows redirects, and the request is retried as a GET when the server
//! answers 404 or 405, since some servers reject HEAD outright.
//!
//! # Classification Table
//!
//! | Outcome | Error | Message |
//! |---------|-------|---------|
//! | 2xx | no | none |
//! | 3xx | no | `Redirect N` |
//! | code allowed by the domain rule | no | `<description> (N)` |
//! | code in the whitelist | no | `Access restricted (N)` |
//! | any other code | yes | `HTTP N` |
//! | timeout, rule ignores timeouts | no | `<description> (timeout ignored)` |
//! | timeout | yes | `Timeout` |
//! | connection failure | yes | `Connection Error` |
//! | redirect limit exceeded | yes | `Too Many Redirects` |
//! | other request failure | yes | `Request Error: ...` |
//! | anything else | yes | `Unknown Error: ...` |

use crate::config::{merge_domain_rules, CrawlConfig, DomainRule};
use crate::url::{extract_domain, parse_http_url};
use reqwest::{Client, Response, StatusCode};
use std::collections::{BTreeSet, HashMap};
use url::Url;

/// The verdict for one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkVerdict {
    pub is_error: bool,
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl LinkVerdict {
    fn ok(status_code: u16) -> Self {
        Self {
            is_error: false,
            status_code: Some(status_code),
            message: None,
        }
    }

    fn allowed(status_code: Option<u16>, message: String) -> Self {
        Self {
            is_error: false,
            status_code,
            message: Some(message),
        }
    }

    fn dead(status_code: Option<u16>, message: String) -> Self {
        Self {
            is_error: true,
            status_code,
            message: Some(message),
        }
    }

    /// Returns true for a non-error 3xx answer
    pub fn is_redirect(&self) -> bool {
        !self.is_error && matches!(self.status_code, Some(300..=399))
    }

    /// Message text, empty when the link was plainly fine
    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

/// Classifies links for one crawl
///
/// Domain rules are merged with the built-in defaults once, when the
/// classifier is built.
pub struct LinkClassifier {
    client: Client,
    whitelist: BTreeSet<u16>,
    rules: HashMap<String, DomainRule>,
}

impl LinkClassifier {
    /// Creates a classifier for the given crawl configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the whitelist and user domain rules
    /// * `client` - HTTP client; its timeout and redirect limit apply to every check
    pub fn new(config: &CrawlConfig, client: Client) -> Self {
        Self {
            client,
            whitelist: config.whitelist_codes.clone(),
            rules: merge_domain_rules(&config.domain_rules),
        }
    }

    /// Checks a single link and returns its verdict
    ///
    /// Never fails: every transport problem maps to an error verdict.
    pub async fn classify(&self, url: &str) -> LinkVerdict {
        let parsed = match parse_http_url(url) {
            Ok(parsed) => parsed,
            Err(e) => return LinkVerdict::dead(None, format!("Request Error: {}", e)),
        };

        match self.probe(&parsed).await {
            Ok(response) => self.classify_status(&parsed, response.status().as_u16()),
            Err(e) => self.classify_failure(&parsed, &e),
        }
    }

    /// HEAD first, falling back to GET for 404 and 405
    async fn probe(&self, url: &Url) -> Result<Response, reqwest::Error> {
        let response = self.client.head(url.clone()).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => {
                tracing::debug!("HEAD {} answered {}, retrying as GET", url, response.status());
                self.client.get(url.clone()).send().await
            }
            _ => Ok(response),
        }
    }

    /// Maps a final status code to a verdict
    pub fn classify_status(&self, url: &Url, code: u16) -> LinkVerdict {
        if (200..300).contains(&code) {
            return LinkVerdict::ok(code);
        }

        if (300..400).contains(&code) {
            return LinkVerdict::allowed(Some(code), format!("Redirect {}", code));
        }

        if let Some(rule) = self.rule_for(url) {
            if rule.allowed_codes.contains(&code) {
                return LinkVerdict::allowed(
                    Some(code),
                    format!("{} ({})", rule.description, code),
                );
            }
        }

        if self.whitelist.contains(&code) {
            return LinkVerdict::allowed(Some(code), format!("Access restricted ({})", code));
        }

        LinkVerdict::dead(Some(code), format!("HTTP {}", code))
    }

    fn classify_failure(&self, url: &Url, error: &reqwest::Error) -> LinkVerdict {
        if error.is_timeout() {
            return match self.rule_for(url) {
                Some(rule) if rule.ignore_timeouts => LinkVerdict::allowed(
                    None,
                    format!("{} (timeout ignored)", rule.description),
                ),
                _ => LinkVerdict::dead(None, "Timeout".to_string()),
            };
        }

        if error.is_connect() {
            return LinkVerdict::dead(None, "Connection Error".to_string());
        }

        if error.is_redirect() {
            return LinkVerdict::dead(None, "Too Many Redirects".to_string());
        }

        if error.is_request() || error.is_builder() {
            return LinkVerdict::dead(None, format!("Request Error: {}", error));
        }

        LinkVerdict::dead(None, format!("Unknown Error: {}", error))
    }

    fn rule_for(&self, url: &Url) -> Option<&DomainRule> {
        extract_domain(url).and_then(|domain| self.rules.get(&domain))
    }
}
