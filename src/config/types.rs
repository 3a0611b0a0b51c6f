use serde::Deserialize;

/// Main configuration structure for Mirror-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Root URL of the tree to mirror
    #[serde(default = "default_root")]
    pub root: String,

    /// Number of workers (maximum concurrent HTTP requests)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum crawl depth; the root page has depth 1
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Base directory holding the mirror and the metadata tree
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Name of the metadata (shadow tree) directory inside `directory`
    #[serde(rename = "metadata-dir", default = "default_metadata_dir")]
    pub metadata_dir: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            workers: default_workers(),
            max_depth: default_max_depth(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            metadata_dir: default_metadata_dir(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `name/version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

fn default_root() -> String {
    "http://localhost:8000/".to_string()
}

fn default_workers() -> usize {
    10
}

fn default_max_depth() -> u32 {
    20
}

fn default_request_timeout() -> u64 {
    20
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_metadata_dir() -> String {
    ".meta".to_string()
}

fn default_crawler_name() -> String {
    "mirror-crawl".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
