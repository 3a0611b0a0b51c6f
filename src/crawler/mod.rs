//! Crawler module for mirroring a remote tree
//!
//! This module contains the core crawling logic, including:
//! - Conditional HTTP fetching
//! - HTML link extraction
//! - The frontier, admission gate and completion join
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Crawler, PageOutcome};
pub use fetcher::{build_http_client, fetch_conditional, is_html, media_type, FetchResult};
pub use parser::extract_hrefs;
pub use scheduler::{AdmissionGate, CompletionJoin, Frontier, Scheduler};
