use crate::url::InvalidUrl;
use url::Url;

/// Schemes that never point at a fetchable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes a URL into the form used for requests and de-duplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Reject URLs without a host
/// 4. Remove the fragment (it is never sent to the server)
///
/// Parsing already canonicalizes the scheme and host case, default ports,
/// dot segments and percent-encoding, so two spellings of the same address
/// end up as the same string.
///
/// # Examples
///
/// ```
/// use sitemap_link_validator::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, InvalidUrl> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| InvalidUrl::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(InvalidUrl::Scheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(InvalidUrl::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Resolves an anchor `href` into an absolute URL to validate
///
/// Absolute `http(s)` links are taken as they are; everything else is
/// resolved against the site base URL.
///
/// Returns None if the link should not be checked:
/// - empty and fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that do not resolve to an HTTP(S) URL
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let resolved = if lower.starts_with("http://") || lower.starts_with("https://") {
        href.to_string()
    } else {
        base_url.join(href).ok()?.to_string()
    };

    normalize_url(&resolved).ok()
}
