use url::{ParseError, Url};

/// Scheme prefixes that never point at a mirrorable resource
const DISALLOWED_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Decides whether a raw anchor href should be followed, and in what form
///
/// Only forward, relative references inside the current directory tree are
/// accepted. The accepted form is relative to the page the href was found on
/// and is appended verbatim to that page's URL.
///
/// # Decision Steps (first match wins)
///
/// 1. Empty href → reject
/// 2. Fragment or query only (`#...`, `?...`) → reject
/// 3. Self references (`/`, `.`, `./`) → reject
/// 4. Strip a leading `./`
/// 5. Upward traversal (`..` prefix) → reject
/// 6. Anything with a scheme or host (absolute, protocol-relative) → reject
/// 7. `mailto:`, `tel:`, `javascript:` prefixes → reject
/// 8. Strip a single leading `/`
/// 9. Accept the remainder unless stripping left nothing but a self reference
///
/// Step 9 is stricter than a plain first-match walk: `./#top`, `./?x` and
/// `.//` pass steps 1 to 8 only because their prefix was stripped, and they
/// are rejected here instead of being accepted as `#top`, `?x` or `/`.
///
/// Trailing slashes are preserved, so directory links stay distinguishable
/// from file links. No escaping or unescaping is performed here.
///
/// # Examples
///
/// ```
/// use mirror_crawl::sanitize_relative_href;
///
/// assert_eq!(sanitize_relative_href("./docs/"), Some("docs/"));
/// assert_eq!(sanitize_relative_href("/a"), Some("a"));
/// assert_eq!(sanitize_relative_href("../up"), None);
/// assert_eq!(sanitize_relative_href("https://example.com/"), None);
/// ```
pub fn sanitize_relative_href(href: &str) -> Option<&str> {
    if href.is_empty() {
        return None;
    }

    if href.starts_with('#') || href.starts_with('?') {
        return None;
    }

    if href == "/" || href == "." || href == "./" {
        return None;
    }

    let href = href.strip_prefix("./").unwrap_or(href);

    if href.starts_with("..") {
        return None;
    }

    if has_scheme_or_host(href) {
        return None;
    }

    if DISALLOWED_PREFIXES
        .iter()
        .any(|prefix| href.starts_with(prefix))
    {
        return None;
    }

    let href = href.strip_prefix('/').unwrap_or(href);

    // `.//` and `./#top` only survive the checks above by losing their prefix
    if href.is_empty() || href.starts_with('#') || href.starts_with('?') {
        return None;
    }

    Some(href)
}

/// Reports whether an href parses as a URL carrying a scheme or a host
///
/// Relative references fail to parse on their own, which is the only parse
/// error that marks an href as usable. Protocol-relative `//host/...`
/// references would pick up the page's scheme, so they count as having a
/// host.
fn has_scheme_or_host(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }

    match Url::parse(href) {
        Ok(_) => true,
        Err(ParseError::RelativeUrlWithoutBase) => false,
        Err(_) => true,
    }
}
