/// Checks whether a URL is exempt from validation
///
/// Patterns are evaluated in order and the first match wins. Four forms are
/// recognised, all compared case-sensitively against the pattern with every
/// `*` removed:
///
/// 1. `*middle*` matches when the URL contains `middle`
/// 2. `*suffix` matches when the URL ends with `suffix`
/// 3. `prefix*` matches when the URL starts with `prefix`
/// 4. anything else matches only on exact equality
///
/// # Arguments
///
/// * `url` - The normalized URL string to check
/// * `patterns` - The configured ignore patterns
///
/// # Examples
///
/// ```
/// use sitemap_link_validator::url::is_url_ignored;
///
/// let patterns = vec!["*/admin/*".to_string(), "*.pdf".to_string()];
///
/// assert!(is_url_ignored("https://example.com/admin/users", &patterns));
/// assert!(is_url_ignored("https://example.com/files/report.pdf", &patterns));
/// assert!(!is_url_ignored("https://example.com/about", &patterns));
/// ```
pub fn is_url_ignored(url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| matches_pattern(pattern, url))
}

fn matches_pattern(pattern: &str, url: &str) -> bool {
    let leading = pattern.starts_with('*');
    let trailing = pattern.ends_with('*');
    let stripped = pattern.replace('*', "");

    match (leading, trailing) {
        (true, true) => url.contains(&stripped),
        (true, false) => url.ends_with(&stripped),
        (false, true) => url.starts_with(&stripped),
        (false, false) => url == pattern,
    }
}
