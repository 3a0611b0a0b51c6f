//! Storage module for persisting fetch metadata between runs
//!
//! This module handles the shadow tree that sits next to the mirror:
//! - One directory per mirrored path
//! - The last seen etag of that path (`tag.txt`)
//! - The time of the last successful fetch (`meta.txt`)

mod fetch_cache;

pub use fetch_cache::{FetchCache, LAST_FETCH_FILE, TAG_FILE};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid timestamp in {}: {message}", path.display())]
    Timestamp { path: PathBuf, message: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
