//! Listing pagination
//!
//! Follows the listing's next-page links on one session and gathers the
//! product URLs of every page into a single de-duplicated set.

use crate::browser::PageSession;
use crate::extract::Extractor;
use crate::model::ProductRefs;
use crate::url::canonicalize;
use crate::{ExtractError, Result, ScrapeError};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// What a pagination run gathered
#[derive(Debug, Clone, Default)]
pub struct ListingWalk {
    pub product_refs: ProductRefs,

    /// Listing pages read, the starting page included
    pub pages_visited: usize,
}

/// Collects every product URL reachable through the listing's pagination
///
/// Starts from `start_url`, reusing the page already loaded in the session
/// when it is that URL. Stops at the first page without a next-page link,
/// or when the next link points back to a page already read.
pub async fn collect_all_product_urls<S: PageSession>(
    session: &mut S,
    extractor: &dyn Extractor,
    start_url: &Url,
) -> Result<ListingWalk> {
    let already_loaded = session
        .current_page()
        .map(|page| &page.url == start_url)
        .unwrap_or(false);
    if !already_loaded {
        session.navigate(start_url).await?;
    }

    let mut visited: HashSet<Url> = HashSet::new();
    let mut walk = ListingWalk::default();

    loop {
        let page_url = session
            .current_page()
            .map(|page| page.url.clone())
            .ok_or(ScrapeError::NoPageLoaded)?;
        visited.insert(page_key(&page_url));
        walk.pages_visited += 1;

        let listing = session
            .evaluate(|document, url| extractor.listing_page(document, url))
            .await?
            .map_err(|source| extraction_error(&page_url, source))?;

        let mut urls = Vec::with_capacity(listing.product_hrefs.len());
        for href in &listing.product_hrefs {
            urls.push(resolve(href, &page_url)?);
        }
        let found = urls.len();
        let added = walk.product_refs.merge(urls);
        debug!(
            "Listing page {}: {} products, {} new ({} total)",
            page_url,
            found,
            added,
            walk.product_refs.len()
        );

        let Some(next_href) = listing.next_page_href else {
            break;
        };
        let next_url = resolve(&next_href, &page_url)?;
        if visited.contains(&page_key(&next_url)) {
            warn!(
                "Listing page {} links back to already read page {}; stopping pagination",
                page_url, next_url
            );
            break;
        }

        session.navigate(&next_url).await?;
    }

    debug!(
        "Pagination finished after {} page(s) with {} product URLs",
        walk.pages_visited,
        walk.product_refs.len()
    );
    Ok(walk)
}

fn resolve(href: &str, page_url: &Url) -> Result<Url> {
    canonicalize(href, page_url).map_err(|e| {
        extraction_error(
            page_url,
            ExtractError::InvalidUrl {
                href: href.to_string(),
                reason: e.to_string(),
            },
        )
    })
}

/// Identity of a listing page for loop detection
fn page_key(url: &Url) -> Url {
    canonicalize(url.as_str(), url).unwrap_or_else(|_| url.clone())
}

fn extraction_error(page_url: &Url, source: ExtractError) -> ScrapeError {
    ScrapeError::Extraction {
        url: page_url.to_string(),
        source,
    }
}
