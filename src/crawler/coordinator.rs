//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the code that ties a crawl together:
//! - Bootstrapping the mirror root and the shadow tree
//! - Running the fixed pool of workers over the frontier
//! - The per-page pipeline: conditional fetch, then save or harvest links
//! - Waiting for exhaustion and reporting totals

use crate::config::{normalize_root, validate, Config};
use crate::crawler::fetcher::{self, FetchResult};
use crate::crawler::parser::extract_hrefs;
use crate::crawler::scheduler::Scheduler;
use crate::output::{CrawlReport, CrawlStats};
use crate::state::{Page, VisitedGuard};
use crate::storage::FetchCache;
use crate::url::{child_page, mirror_dir_name, sanitize_relative_href};
use crate::{ConfigError, MirrorError};
use reqwest::{Client, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;

/// What happened to a page that made it through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// A non-HTML resource was written to the mirror
    Saved { bytes: u64 },

    /// The server confirmed the cached copy is current
    Unmodified,

    /// An HTML page was scanned; `admitted` child pages were submitted
    Harvested { admitted: usize },
}

/// Everything that stays the same across runs of one configured crawl
#[derive(Debug)]
struct Shared {
    config: Config,
    root: Url,
    mirror_root: PathBuf,
    cache: FetchCache,
    client: Client,
}

/// Main crawler structure
///
/// Built once per configuration by [`Crawler::new`], which prepares the
/// output directories. Each call to [`Crawler::run`] performs a complete
/// crawl with fresh visited-set and counters.
#[derive(Debug, Clone)]
pub struct Crawler {
    shared: Arc<Shared>,
}

impl Crawler {
    /// Creates a new crawler and prepares its output directories
    ///
    /// # Bootstrap Steps
    ///
    /// 1. Validate the configuration
    /// 2. Parse the root URL
    /// 3. Create (or reuse) `<output>/<host>` as the mirror root
    /// 4. Resolve the mirror root to an absolute path
    /// 5. Create (or reuse) `<output>/<metadata-dir>/<host>` as the shadow tree
    ///
    /// Any failure here is fatal: no page has been fetched yet.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(MirrorError)` - Invalid configuration or unusable output directory
    pub async fn new(config: Config) -> Result<Self, MirrorError> {
        validate(&config)?;

        let root = normalize_root(&config.crawler.root)?;
        let host_dir = mirror_dir_name(&root).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("Root URL '{}' has no host", root))
        })?;

        let base = PathBuf::from(&config.output.directory);
        let mirror_root = base.join(&host_dir);
        fs::create_dir_all(&mirror_root)
            .await
            .map_err(|source| MirrorError::Bootstrap {
                path: mirror_root.clone(),
                source,
            })?;

        let mirror_root = fs::canonicalize(&mirror_root)
            .await
            .map_err(|source| MirrorError::Bootstrap {
                path: mirror_root.clone(),
                source,
            })?;

        let shadow_root = base.join(&config.output.metadata_dir).join(&host_dir);
        let cache = FetchCache::open(shadow_root).await?;
        let client = fetcher::build_http_client(&config)?;

        tracing::info!("Mirroring {} into {}", root, mirror_root.display());

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                root,
                mirror_root,
                cache,
                client,
            }),
        })
    }

    /// Root URL of the crawl, always ending in `/`
    pub fn root(&self) -> &Url {
        &self.shared.root
    }

    /// Absolute path of the mirror root
    pub fn mirror_root(&self) -> &Path {
        &self.shared.mirror_root
    }

    /// The fetch cache backing conditional requests
    pub fn cache(&self) -> &FetchCache {
        &self.shared.cache
    }

    /// Runs one complete crawl
    ///
    /// Seeds the root page, starts the workers, and blocks until every
    /// submitted page has been handled. There is no overall timeout; the
    /// crawl ends when the frontier runs dry.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Totals of the finished crawl
    /// * `Err(MirrorError)` - Reserved for failures outside page handling
    pub async fn run(&self) -> Result<CrawlReport, MirrorError> {
        let workers = self.shared.config.crawler.workers;
        let start = Instant::now();

        let crawl = Arc::new(CrawlRun {
            shared: Arc::clone(&self.shared),
            visited: VisitedGuard::new(),
            stats: CrawlStats::new(),
            scheduler: Scheduler::new(workers),
        });

        let root = Page::root(self.shared.root.as_str());
        crawl.visited.insert(&root.url);
        crawl.scheduler.submit(root);

        tracing::info!("Starting crawl with {} workers", workers);
        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let crawl = Arc::clone(&crawl);
                tokio::spawn(async move { crawl.worker(id).await })
            })
            .collect();

        crawl.scheduler.wait_idle().await;
        crawl.scheduler.close();

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Worker task failed: {}", e);
            }
        }

        let report = crawl.stats.report(start.elapsed());
        tracing::info!(
            "Crawl finished: {} URLs visited, {} files saved",
            crawl.visited.len(),
            report.saved
        );

        Ok(report)
    }
}

/// State of one crawl in progress, shared by all of its workers
struct CrawlRun {
    shared: Arc<Shared>,
    visited: VisitedGuard,
    stats: CrawlStats,
    scheduler: Scheduler,
}

impl CrawlRun {
    /// Worker loop: take pages until the frontier closes
    async fn worker(&self, id: usize) {
        tracing::trace!("Worker {} started", id);

        while let Some(page) = self.scheduler.next_page().await {
            self.handle_page(&page).await;
            self.scheduler.complete();
        }

        tracing::trace!("Worker {} stopped", id);
    }

    /// Handles one page; every outcome, including failure, is final
    async fn handle_page(&self, page: &Page) {
        if page.exceeds(self.shared.config.crawler.max_depth) {
            tracing::debug!("Skipping {} (beyond max depth)", page);
            self.stats.record_skipped();
            return;
        }

        tracing::info!("Visiting {}", page);

        match self.process_page(page).await {
            Ok(PageOutcome::Saved { bytes }) => {
                tracing::debug!("Saved {} ({} bytes)", page.path, bytes);
                self.stats.record_saved(bytes);
            }
            Ok(PageOutcome::Unmodified) => {
                tracing::info!("Unmodified {}", page.url);
                self.stats.record_unmodified();
            }
            Ok(PageOutcome::Harvested { admitted }) => {
                tracing::debug!("Queued {} new links from {}", admitted, page.url);
            }
            Err(e) => {
                tracing::warn!("Abandoning {}: {}", page, e);
                self.stats.record_failed();
            }
        }
    }

    /// Runs the fetch pipeline for one page
    ///
    /// 1. Look up the cached etag and send a conditional GET
    /// 2. Stop on 304; fail on anything but 200
    /// 3. Parse the Content-Type
    /// 4. HTML: create the matching directory and harvest links
    /// 5. Anything else: save the body and refresh the cache entry
    async fn process_page(&self, page: &Page) -> Result<PageOutcome, MirrorError> {
        let etag = self.shared.cache.lookup(&page.path).await?;

        let response =
            match fetcher::fetch_conditional(&self.shared.client, &page.url, &etag).await? {
                FetchResult::NotModified => return Ok(PageOutcome::Unmodified),
                FetchResult::Modified(response) => response,
            };

        let media_type = fetcher::media_type(fetcher::content_type(response.headers()))
            .map_err(|message| MirrorError::MediaType {
                url: page.url.clone(),
                message,
            })?;

        if fetcher::is_html(&media_type) {
            self.harvest_links(page, response).await
        } else {
            self.save_resource(page, response).await
        }
    }

    /// Turns an HTML page into a directory and submits its in-tree links
    ///
    /// The HTML itself is never written to the mirror or the cache.
    async fn harvest_links(
        &self,
        page: &Page,
        response: Response,
    ) -> Result<PageOutcome, MirrorError> {
        let dir = self.shared.mirror_root.join(&page.path);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| MirrorError::Write { path: dir, source })?;

        let body = response.text().await.map_err(|source| MirrorError::Body {
            url: page.url.clone(),
            source,
        })?;

        let mut children = Vec::new();
        for href in extract_hrefs(&body) {
            let Some(href) = sanitize_relative_href(&href) else {
                tracing::trace!("Ignoring link '{}' on {}", href, page.url);
                continue;
            };

            let child = match child_page(page, href) {
                Ok(child) => child,
                Err(e) => {
                    tracing::debug!("Dropping link '{}' on {}: {}", href, page.url, e);
                    continue;
                }
            };

            if !self.visited.test_and_insert(&child.url) {
                continue;
            }

            children.push(child);
        }

        let admitted = children.len();
        self.scheduler.submit_all(children);

        Ok(PageOutcome::Harvested { admitted })
    }

    /// Writes a non-HTML resource to the mirror and records its etag
    async fn save_resource(
        &self,
        page: &Page,
        response: Response,
    ) -> Result<PageOutcome, MirrorError> {
        let etag = fetcher::etag(response.headers());
        let dest = self.shared.mirror_root.join(&page.path);

        let bytes = save_content(&dest, &page.url, response).await?;

        if let Err(e) = self.shared.cache.store(&page.path, &etag).await {
            tracing::warn!("Failed saving etag for {}: {}", page.url, e);
        }

        Ok(PageOutcome::Saved { bytes })
    }
}

/// Streams a response body into `dest`, truncating any previous copy
///
/// Missing parent directories are created, since a link such as
/// `docs/guide.txt` can name a file whose directory was never listed.
async fn save_content(
    dest: &Path,
    url: &str,
    mut response: Response,
) -> Result<u64, MirrorError> {
    let write_error = |source: std::io::Error| MirrorError::Write {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| MirrorError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let mut file = fs::File::create(dest).await.map_err(write_error)?;
    let mut written = 0u64;

    while let Some(chunk) = response.chunk().await.map_err(|source| MirrorError::Body {
        url: url.to_string(),
        source,
    })? {
        file.write_all(&chunk).await.map_err(write_error)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(write_error)?;
    Ok(written)
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(MirrorError)` - Bootstrap failed
///
/// # Example
///
/// ```no_run
/// use mirror_crawl::config::Config;
/// use mirror_crawl::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default()).await?;
/// println!("saved {} files", report.saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, MirrorError> {
    Crawler::new(config).await?.run().await
}
