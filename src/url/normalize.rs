use url::Url;

/// Schemes that never point at a checkable resource
const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Normalizes an anchor target found on `base_url`
///
/// # Normalization Steps
///
/// 1. Strip the fragment (everything from the first `#`)
/// 2. Drop empty targets, fragment-only targets, and `mailto:`, `tel:`,
///    `javascript:` targets
/// 3. Resolve relative references against the page URL
///
/// # Returns
///
/// * `Some(Url)` - Absolute URL to check
/// * `None` - The target should be ignored
///
/// # Examples
///
/// ```
/// use url::Url;
/// use deadlink_crawler::url::normalize_link;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let link = normalize_link("intro#setup", &base).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/docs/intro");
/// assert!(normalize_link("mailto:team@example.com", &base).is_none());
/// ```
pub fn normalize_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    let href = match href.split_once('#') {
        Some((before, _)) => before,
        None => href,
    };

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    absolute.set_fragment(None);
    Some(absolute)
}

/// Returns true if `link` lives on the same host and port as `seed`
///
/// This is exact host comparison: `blog.example.com` is external to
/// `example.com`.
pub fn is_internal(link: &Url, seed: &Url) -> bool {
    match link.host_str() {
        None => true,
        Some(host) => {
            seed.host_str() == Some(host)
                && link.port_or_known_default() == seed.port_or_known_default()
        }
    }
}
