//! Built-in domain rules and the merge with user-supplied rules

use crate::config::types::DomainRule;
use crate::url::normalize_domain;
use std::collections::{BTreeMap, HashMap};

/// Rules for platforms that routinely answer crawlers with error codes
pub fn default_domain_rules() -> BTreeMap<String, DomainRule> {
    let mut rules = BTreeMap::new();
    rules.insert(
        "linkedin.com".to_string(),
        DomainRule::new([999], "LinkedIn rate limiting"),
    );
    rules.insert(
        "twitter.com".to_string(),
        DomainRule::new([403], "Twitter access restriction"),
    );
    rules.insert(
        "x.com".to_string(),
        DomainRule::new([403], "X/Twitter access restriction"),
    );
    rules
}

/// Merges user rules over the defaults
///
/// User keys are normalized first (lower-cased, `www.` stripped). A user rule
/// replaces the default rule for the same key wholesale; fields are not merged.
pub fn merge_domain_rules(user: &BTreeMap<String, DomainRule>) -> HashMap<String, DomainRule> {
    let mut merged: HashMap<String, DomainRule> = default_domain_rules().into_iter().collect();

    for (domain, rule) in user {
        merged.insert(normalize_domain(domain), rule.clone());
    }

    merged
}
