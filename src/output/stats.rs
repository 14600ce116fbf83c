//! Run statistics
//!
//! Counters collected while a crawl runs. They describe the run, not the
//! catalogue, and are never written into the artifacts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Crawl statistics summary
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,

    /// Set once the browser has been released
    pub finished_at: Option<DateTime<Utc>>,

    /// Listing pages read during pagination
    pub listing_pages: usize,

    /// Unique product URLs collected from the listing
    pub product_refs: usize,

    /// Detail records harvested
    pub products: usize,

    /// Category nodes in the hierarchy, every level counted
    pub categories: usize,

    pub sessions_opened: usize,

    /// Subresource requests the request filter refused
    pub requests_aborted: u64,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            listing_pages: 0,
            product_refs: 0,
            products: 0,
            categories: 0,
            sessions_opened: 0,
            requests_aborted: 0,
        }
    }
}

impl CrawlStats {
    /// Whole seconds between start and finish, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// Logs the statistics of a finished crawl
pub fn log_statistics(stats: &CrawlStats) {
    info!("=== Crawl Statistics ===");
    info!(
        "  Categories: {}, listing pages: {}, product URLs: {}",
        stats.categories, stats.listing_pages, stats.product_refs
    );
    info!("  Products harvested: {}", stats.products);
    info!(
        "  Sessions opened: {}, requests aborted: {}",
        stats.sessions_opened, stats.requests_aborted
    );
    if let Some(seconds) = stats.duration_seconds() {
        info!("  Duration: {} seconds ({:.2} minutes)", seconds, seconds as f64 / 60.0);
    }
}
