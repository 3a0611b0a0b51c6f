//! URL utilities for deciding which links to follow and where they land
//!
//! This module provides:
//! - Href sanitization (which anchor references stay inside the mirrored tree)
//! - Child page construction (absolute URL plus decoded mirrored path)
//! - Naming of the per-host mirror directory

mod sanitize;

pub use sanitize::sanitize_relative_href;

use crate::state::Page;
use crate::{UrlError, UrlResult};
use std::path::{Component, Path};
use url::Url;

/// Builds the child page reached from `parent` through an accepted href
///
/// The child URL is the parent URL with `href` appended verbatim. The
/// mirrored path is the parent path with `href` appended, then
/// percent-decoded so that `my%20file.txt` is written as `my file.txt`.
///
/// # Arguments
///
/// * `parent` - The HTML page the href was found on
/// * `href` - An href already accepted by [`sanitize_relative_href`]
///
/// # Returns
///
/// * `Ok(Page)` - The child page, one level deeper than `parent`
/// * `Err(UrlError)` - The path could not be decoded or would escape the mirror root
///
/// # Examples
///
/// ```
/// use mirror_crawl::{child_page, Page};
///
/// let root = Page::root("http://localhost:8000/");
/// let child = child_page(&root, "my%20docs/").unwrap();
/// assert_eq!(child.url, "http://localhost:8000/my%20docs/");
/// assert_eq!(child.path, "my docs/");
/// assert_eq!(child.depth, 2);
/// ```
pub fn child_page(parent: &Page, href: &str) -> UrlResult<Page> {
    let url = format!("{}{}", parent.url, href);
    let raw_path = format!("{}{}", parent.path, href);

    let path = urlencoding::decode(&raw_path)
        .map_err(|_| UrlError::Decode(raw_path.clone()))?
        .into_owned();

    if !is_contained(&path) {
        return Err(UrlError::UnsafePath(path));
    }

    Ok(Page::new(url, path, parent.depth + 1))
}

/// Checks that a relative mirrored path stays below the mirror root
fn is_contained(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Returns the name of the mirror directory for a root URL
///
/// The name is the URL's host, followed by `:port` when the URL names a
/// port explicitly.
pub fn mirror_dir_name(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
