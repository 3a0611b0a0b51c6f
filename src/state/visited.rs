use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Concurrency-safe set of URLs admitted into the frontier
///
/// Admission is the only thing that stops a crawl from looping forever on a
/// cyclic site graph, so each URL must be admitted at most once no matter how
/// many workers discover it at the same time.
#[derive(Debug, Default)]
pub struct VisitedGuard {
    urls: Mutex<HashSet<String>>,
}

impl VisitedGuard {
    /// Creates an empty guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `url`, returning true only for the caller that inserted it first
    pub fn test_and_insert(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Inserts `url` unconditionally; used to seed the root URL
    pub fn insert(&self, url: &str) {
        self.lock().insert(url.to_string());
    }

    /// Returns true if `url` has been admitted
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Number of admitted URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no URL has been admitted yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set is never left half-updated, so a poisoned lock is still usable
        self.urls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
