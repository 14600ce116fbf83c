//! Crawler coordinator - main crawl orchestration logic
//!
//! Drives one crawl through its stages:
//! - Open a shared session and load the entry page
//! - Read the category hierarchy from it
//! - Page through the listing on the same session
//! - Release the shared session and harvest every product concurrently
//! - Combine everything into a `CrawlResult`
//!
//! Whatever happens, the run ends by shutting the session pool down, which
//! closes the browser.

use crate::browser::{Browser, PageSession, RequestFilter};
use crate::config::CrawlerConfig;
use crate::crawler::harvester::harvest_all;
use crate::crawler::hierarchy::walk;
use crate::crawler::listing::collect_all_product_urls;
use crate::crawler::pool::{PooledSession, SessionPool};
use crate::extract::Extractor;
use crate::model::{CategoryTree, CrawlResult, ProductRefs};
use crate::output::CrawlStats;
use crate::state::CrawlStage;
use crate::{Result, ScrapeError};
use chrono::Utc;
use std::sync::Arc;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<B: Browser> {
    pool: Arc<SessionPool<B>>,
    extractor: Arc<dyn Extractor>,
    stage: CrawlStage,
    stats: CrawlStats,
}

impl<B: Browser> Coordinator<B> {
    /// Creates a coordinator owning `browser`
    ///
    /// Sessions are limited to `max-concurrent-sessions` and only ever load
    /// top-level documents.
    pub fn new(browser: B, extractor: Arc<dyn Extractor>, config: &CrawlerConfig) -> Self {
        let pool = SessionPool::new(
            browser,
            config.max_concurrent_sessions,
            RequestFilter::document_only(),
        );
        Self {
            pool: Arc::new(pool),
            extractor,
            stage: CrawlStage::Start,
            stats: CrawlStats::default(),
        }
    }

    pub fn stage(&self) -> CrawlStage {
        self.stage
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Runs the crawl from `entry_url`
    ///
    /// A coordinator runs once: its browser is closed when this returns,
    /// whether the crawl succeeded or not. On failure the first error is
    /// returned unchanged and no partial result is produced.
    pub async fn run(&mut self, entry_url: &Url) -> Result<CrawlResult> {
        if self.stage != CrawlStage::Start || self.pool.is_shut_down() {
            return Err(ScrapeError::BrowserClosed);
        }

        tracing::info!("Starting crawl of {}", entry_url);
        self.stats.started_at = Utc::now();

        let outcome = self.run_stages(entry_url).await;
        let shutdown = self.pool.shutdown().await;

        self.stats.finished_at = Some(Utc::now());
        self.stats.sessions_opened = self.pool.sessions_opened();
        self.stats.requests_aborted = self.pool.requests_aborted();

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Crawl of {} failed at stage {}: {}", entry_url, self.stage, e);
                if let Err(close_err) = shutdown {
                    tracing::warn!("Browser shutdown also failed: {}", close_err);
                }
                return Err(e);
            }
        };
        shutdown?;

        self.advance(CrawlStage::Done)?;
        Ok(result)
    }

    async fn run_stages(&mut self, entry_url: &Url) -> Result<CrawlResult> {
        let mut shared = self.pool.acquire().await?;
        let discovered = self.discover(&mut shared, entry_url).await;
        let released = shared.release().await;
        let (hierarchy, refs) = discovered?;
        released?;

        let products = harvest_all(Arc::clone(&self.pool), Arc::clone(&self.extractor), refs).await?;
        self.stats.products = products.len();
        self.advance(CrawlStage::DetailsHarvested)?;

        let result = CrawlResult {
            hierarchy,
            products,
        };
        self.advance(CrawlStage::Aggregated)?;
        Ok(result)
    }

    /// Hierarchy and listing stages, both on the shared session
    async fn discover(
        &mut self,
        shared: &mut PooledSession<B>,
        entry_url: &Url,
    ) -> Result<(CategoryTree, ProductRefs)> {
        tracing::debug!("Navigating to {}", entry_url);
        shared.navigate(entry_url).await?;

        let hierarchy = walk(&**shared, self.extractor.as_ref()).await?;
        self.stats.categories = hierarchy.node_count();
        self.advance(CrawlStage::HierarchyFetched)?;

        let start_url = shared
            .current_page()
            .map(|page| page.url.clone())
            .ok_or(ScrapeError::NoPageLoaded)?;
        let listing = collect_all_product_urls(&mut **shared, self.extractor.as_ref(), &start_url).await?;
        self.stats.listing_pages = listing.pages_visited;
        self.stats.product_refs = listing.product_refs.len();
        self.advance(CrawlStage::ListingCollected)?;

        Ok((hierarchy, listing.product_refs))
    }

    fn advance(&mut self, to: CrawlStage) -> Result<()> {
        self.stage.transition(to)?;
        match to {
            CrawlStage::HierarchyFetched => tracing::info!(
                "Hierarchy fetched: {} categories",
                self.stats.categories
            ),
            CrawlStage::ListingCollected => tracing::info!(
                "Listing collected: {} product URLs over {} page(s)",
                self.stats.product_refs,
                self.stats.listing_pages
            ),
            CrawlStage::DetailsHarvested => {
                tracing::info!("Details harvested: {} products", self.stats.products)
            }
            _ => tracing::info!("Crawl stage: {}", to),
        }
        Ok(())
    }
}
