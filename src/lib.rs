//! Mirror-Crawl: an incremental file-tree mirror
//!
//! This crate mirrors a remote file server or static site into a local
//! directory. HTML pages are treated as directory listings whose links are
//! followed; every other resource is saved to disk. An on-disk etag cache
//! turns re-runs into conditional requests, so unchanged files are skipped.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Mirror-Crawl operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Invalid content type for {url}: {message}")]
    MediaType { url: String, message: String },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to prepare {}: {source}", path.display())]
    Bootstrap {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to build request for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL and mirrored-path errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to percent-decode '{0}'")]
    Decode(String),

    #[error("Path '{0}' escapes the mirror root")]
    UnsafePath(String),
}

/// Result type alias for Mirror-Crawl operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Crawler};
pub use output::CrawlReport;
pub use state::{Page, VisitedGuard};
pub use storage::FetchCache;
pub use url::{child_page, sanitize_relative_href};
