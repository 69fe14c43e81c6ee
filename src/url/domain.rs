use url::Url;

/// Normalizes a host name into a domain-rule key
///
/// Lower-cases the host and strips a single leading `www.`.
///
/// # Examples
///
/// ```
/// use deadlink_crawler::url::normalize_domain;
///
/// assert_eq!(normalize_domain("WWW.LinkedIn.com"), "linkedin.com");
/// assert_eq!(normalize_domain("blog.example.com"), "blog.example.com");
/// ```
pub fn normalize_domain(host: &str) -> String {
    let lower = host.trim().to_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Extracts the normalized domain from a URL
///
/// The port is not part of the domain.
///
/// # Returns
///
/// * `Some(String)` - The lowercase host without `www.`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use deadlink_crawler::url::extract_domain;
///
/// let url = Url::parse("https://www.EXAMPLE.com:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(normalize_domain)
}
