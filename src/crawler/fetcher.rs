//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured timeout and user agent
//! - Conditional GET requests carrying the cached etag
//! - Status classification (200, 304, everything else)
//! - Content-Type parsing

use crate::config::Config;
use crate::MirrorError;
use mime::Mime;
use reqwest::header::{HeaderMap, CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Upper bound on the time spent establishing a connection (seconds)
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Result of a conditional fetch
#[derive(Debug)]
pub enum FetchResult {
    /// The server sent a fresh copy (HTTP 200); the body has not been read yet
    Modified(Response),

    /// The cached copy is current (HTTP 304)
    NotModified,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawl configuration (timeout and user agent)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use mirror_crawl::config::Config;
/// use mirror_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = config.crawler.request_timeout;

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(timeout))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, asking the server to skip the body if `etag` still matches
///
/// The `If-None-Match` header is always sent; it is empty when nothing is
/// cached for the resource.
///
/// # Status Handling
///
/// | Response | Result |
/// |----------|--------|
/// | HTTP 200 | `Ok(Modified)` |
/// | HTTP 304 | `Ok(NotModified)` |
/// | Any other status | `Err(UnexpectedStatus)` |
/// | Transport error or timeout | `Err(Http)` |
///
/// No retries are attempted.
pub async fn fetch_conditional(
    client: &Client,
    url: &str,
    etag: &str,
) -> Result<FetchResult, MirrorError> {
    let request = client
        .get(url)
        .header(IF_NONE_MATCH, etag)
        .build()
        .map_err(|source| MirrorError::Request {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .execute(request)
        .await
        .map_err(|source| MirrorError::Http {
            url: url.to_string(),
            source,
        })?;

    match response.status() {
        StatusCode::OK => Ok(FetchResult::Modified(response)),
        StatusCode::NOT_MODIFIED => Ok(FetchResult::NotModified),
        status => Err(MirrorError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }),
    }
}

/// Parses a Content-Type header value into its base media type
///
/// Parameters such as `charset` are dropped and the result is lowercase.
///
/// # Examples
///
/// ```
/// use mirror_crawl::crawler::media_type;
///
/// assert_eq!(media_type(Some("text/html; charset=utf-8")).unwrap(), "text/html");
/// assert!(media_type(None).is_err());
/// ```
pub fn media_type(content_type: Option<&str>) -> Result<String, String> {
    let raw = content_type.ok_or_else(|| "missing Content-Type header".to_string())?;
    let parsed: Mime = raw
        .trim()
        .parse()
        .map_err(|e: mime::FromStrError| format!("'{}': {}", raw, e))?;

    Ok(parsed.essence_str().to_ascii_lowercase())
}

/// Returns true for the media type whose documents are link sources
pub fn is_html(media_type: &str) -> bool {
    media_type == "text/html"
}

/// Reads the Content-Type header, if present and valid ASCII
pub fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
}

/// Reads the ETag header, or an empty string when the server sent none
pub fn etag(headers: &HeaderMap) -> String {
    headers
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
