//! Configuration module for Mirror-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so the file is optional and may be partial;
//! command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use mirror_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{normalize_root, validate};
