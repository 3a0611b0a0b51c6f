//! State module for tracking crawl progress
//!
//! This module provides the state shared between workers during a crawl.
//!
//! # Components
//!
//! - `Page`: An immutable unit of work (URL, mirrored path, depth)
//! - `VisitedGuard`: The set of URLs already admitted into the frontier

mod page;
mod visited;

// Re-export main types
pub use page::Page;
pub use visited::VisitedGuard;
