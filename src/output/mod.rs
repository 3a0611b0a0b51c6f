//! Output module for reporting crawl results
//!
//! This module handles:
//! - Counting saved, unmodified, failed and skipped pages
//! - Formatting elapsed time
//! - Printing the final summary line

pub mod stats;

pub use stats::{CrawlReport, CrawlStats};

use std::time::Duration;

/// Formats a duration as `HH:MM:SS`
///
/// Hours are not wrapped, so a crawl longer than a day prints e.g. `27:03:09`.
///
/// # Examples
///
/// ```
/// use mirror_crawl::output::format_elapsed;
/// use std::time::Duration;
///
/// assert_eq!(format_elapsed(Duration::from_secs(3725)), "01:02:05");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

/// Returns the one-line completion summary
pub fn summary_line(report: &CrawlReport) -> String {
    format!(
        "completed, fetched {} files in {}",
        report.saved,
        format_elapsed(report.elapsed)
    )
}

/// Logs the detailed counters and prints the completion summary to stdout
pub fn print_report(report: &CrawlReport) {
    tracing::info!(
        "Saved {} files ({} bytes), {} unmodified, {} failed, {} beyond max depth",
        report.saved,
        report.bytes,
        report.unmodified,
        report.failed,
        report.skipped
    );

    println!("{}", summary_line(report));
}
