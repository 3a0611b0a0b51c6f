//! Crawl counters shared by all workers
//!
//! Every counter is bumped at most once per page, by the worker that
//! handled it, and read once when the crawl is over.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters for a running crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    saved: AtomicU64,
    bytes: AtomicU64,
    unmodified: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

impl CrawlStats {
    /// Creates zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one resource written to the mirror
    pub fn record_saved(&self, bytes: u64) {
        self.saved.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records one page the server reported as unmodified
    pub fn record_unmodified(&self) {
        self.unmodified.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one page abandoned because of an error
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one page discarded for exceeding the maximum depth
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of resources saved so far
    pub fn saved(&self) -> u64 {
        self.saved.load(Ordering::Relaxed)
    }

    /// Freezes the counters into a report
    pub fn report(&self, elapsed: Duration) -> CrawlReport {
        CrawlReport {
            saved: self.saved.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            unmodified: self.unmodified.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Final totals of a finished crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Resources written to the mirror
    pub saved: u64,

    /// Bytes written to the mirror
    pub bytes: u64,

    /// Pages answered with 304 Not Modified
    pub unmodified: u64,

    /// Pages abandoned because of an error
    pub failed: u64,

    /// Pages discarded for exceeding the maximum depth
    pub skipped: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}
