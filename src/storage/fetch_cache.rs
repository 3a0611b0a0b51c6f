//! Shadow-tree fetch cache
//!
//! Every successfully mirrored resource gets a directory in the shadow tree
//! at the same relative path, holding the etag the server sent and the time
//! it was fetched. The etag is replayed as `If-None-Match` on the next run.

use crate::storage::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File holding the etag of a mirrored path
pub const TAG_FILE: &str = "tag.txt";

/// File holding the last fetch timestamp of a mirrored path
pub const LAST_FETCH_FILE: &str = "meta.txt";

/// Persistent map from mirrored path to last known etag
///
/// Entries for different paths live in different directories, so concurrent
/// stores for distinct paths never touch the same file. Nothing guards
/// against two processes sharing one shadow tree.
#[derive(Debug, Clone)]
pub struct FetchCache {
    root: PathBuf,
}

impl FetchCache {
    /// Opens the cache rooted at `root`, creating the directory if needed
    ///
    /// # Arguments
    ///
    /// * `root` - Root of the shadow tree
    ///
    /// # Returns
    ///
    /// * `Ok(FetchCache)` - The cache is ready for lookups and stores
    /// * `Err(StorageError)` - The shadow root could not be created
    pub async fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: root.clone(),
                source,
            })?;

        Ok(Self { root })
    }

    /// Returns the root of the shadow tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the cached etag for `path`, or an empty string if none is stored
    pub async fn lookup(&self, path: &str) -> StorageResult<String> {
        let file = self.entry_dir(path).join(TAG_FILE);
        match fs::read_to_string(&file).await {
            Ok(etag) => Ok(etag),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(StorageError::Read { path: file, source }),
        }
    }

    /// Returns when `path` was last stored, if ever
    pub async fn last_fetch(&self, path: &str) -> StorageResult<Option<DateTime<Utc>>> {
        let file = self.entry_dir(path).join(LAST_FETCH_FILE);
        let raw = match fs::read_to_string(&file).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Read { path: file, source }),
        };

        DateTime::parse_from_rfc3339(raw.trim())
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| StorageError::Timestamp {
                path: file,
                message: e.to_string(),
            })
    }

    /// Records `etag` and the current time for `path`, replacing any previous entry
    pub async fn store(&self, path: &str, etag: &str) -> StorageResult<()> {
        let dir = self.entry_dir(path);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let tag_file = dir.join(TAG_FILE);
        fs::write(&tag_file, etag)
            .await
            .map_err(|source| StorageError::Write {
                path: tag_file,
                source,
            })?;

        let meta_file = dir.join(LAST_FETCH_FILE);
        fs::write(&meta_file, Utc::now().to_rfc3339())
            .await
            .map_err(|source| StorageError::Write {
                path: meta_file,
                source,
            })?;

        Ok(())
    }

    fn entry_dir(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}
