//! Crawler module for catalogue discovery and harvesting
//!
//! This module contains the core crawling logic, including:
//! - A bounded pool of browsing sessions over one browser
//! - Category hierarchy walk on the entry page
//! - Listing pagination with loop detection
//! - Concurrent product detail harvest
//! - Overall crawl coordination

mod coordinator;
mod harvester;
mod hierarchy;
mod listing;
mod pool;

pub use coordinator::Coordinator;
pub use harvester::{harvest_all, harvest_one};
pub use hierarchy::walk;
pub use listing::{collect_all_product_urls, ListingWalk};
pub use pool::{PooledSession, SessionPool};

use crate::browser::HttpBrowser;
use crate::config::Config;
use crate::extract::extractor_for;
use crate::model::CrawlResult;
use crate::output::log_statistics;
use crate::url::parse_entry_url;
use crate::{Result, ScrapeError};

/// Crawls the shop at `entry_url` and returns its catalogue
///
/// This is the main entry point for a crawl. It will:
/// 1. Resolve the configured site entry for the URL
/// 2. Launch the HTTP browser
/// 3. Run the coordinator to completion
/// 4. Log the run statistics
///
/// Fails with `ScrapeError::UnsupportedSite` before any request is made when
/// the URL is not one of the configured sites.
pub async fn scrape(config: &Config, entry_url: &str) -> Result<CrawlResult> {
    let url = parse_entry_url(entry_url)?;
    let site = config
        .find_site(url.as_str())
        .ok_or_else(|| ScrapeError::UnsupportedSite {
            url: url.to_string(),
        })?;

    tracing::info!("Using {:?} extraction rules for {}", site.extractor, site.url);
    let extractor = extractor_for(site.extractor);
    let browser = HttpBrowser::launch(&config.crawler, &config.user_agent)?;

    let mut coordinator = Coordinator::new(browser, extractor, &config.crawler);
    let result = coordinator.run(&url).await?;
    log_statistics(coordinator.stats());

    Ok(result)
}
