//! Work item definitions for the crawl frontier
//!
//! A page is created once, handed to exactly one worker, and never mutated.

use std::fmt;

/// A remote resource waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Absolute URL of the resource
    pub url: String,

    /// Mirrored path relative to the mirror root (empty for the root page)
    pub path: String,

    /// Distance from the root page, starting at 1
    pub depth: u32,
}

impl Page {
    /// Creates a new page
    pub fn new(url: impl Into<String>, path: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            depth,
        }
    }

    /// Creates the root page of a crawl: depth 1, mirrored at the mirror root itself
    pub fn root(url: impl Into<String>) -> Self {
        Self::new(url, "", 1)
    }

    /// Returns true if this page lies beyond the maximum crawl depth
    pub fn exceeds(&self, max_depth: u32) -> bool {
        self.depth > max_depth
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth {} page {}", self.depth, self.url)
    }
}
