//! Concurrent product detail harvest
//!
//! Each product URL gets its own task and its own pooled session; the pool
//! bounds how many run at once.

use crate::browser::{Browser, PageSession};
use crate::crawler::pool::SessionPool;
use crate::extract::Extractor;
use crate::model::{ProductDetail, ProductRefs};
use crate::{Result, ScrapeError};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use url::Url;

/// Harvests one product page on a freshly acquired session
///
/// The session goes back to the pool whether or not extraction succeeds.
pub async fn harvest_one<B: Browser>(
    pool: &Arc<SessionPool<B>>,
    extractor: &dyn Extractor,
    url: &Url,
) -> Result<ProductDetail> {
    let mut session = pool.acquire().await?;
    let outcome = read_detail(&mut *session, extractor, url).await;
    let released = session.release().await;

    let detail = outcome?;
    released?;
    debug!("Harvested {} ({})", url, detail.sku);
    Ok(detail)
}

async fn read_detail<S: PageSession>(
    session: &mut S,
    extractor: &dyn Extractor,
    url: &Url,
) -> Result<ProductDetail> {
    session.navigate(url).await?;
    session
        .evaluate(|document, _| extractor.product_detail(document, url))
        .await?
        .map_err(|source| ScrapeError::Extraction {
            url: url.to_string(),
            source,
        })
}

/// Harvests every product in `refs`, one task per URL
///
/// Returns the details in completion order. The first failure is returned as
/// soon as it is seen; harvests still in flight are left to finish on their
/// own and their sessions return to the pool as they do. Harvests still
/// waiting for a session fail once the pool starts shutting down.
pub async fn harvest_all<B: Browser>(
    pool: Arc<SessionPool<B>>,
    extractor: Arc<dyn Extractor>,
    refs: ProductRefs,
) -> Result<Vec<ProductDetail>> {
    let total = refs.len();
    let mut tasks = JoinSet::new();
    for url in refs {
        let pool = Arc::clone(&pool);
        let extractor = Arc::clone(&extractor);
        tasks.spawn(async move { harvest_one(&pool, extractor.as_ref(), &url).await });
    }

    let mut products = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(ScrapeError::from).and_then(|detail| detail);
        match outcome {
            Ok(detail) => products.push(detail),
            Err(e) => {
                warn!(
                    "Harvest failed after {} of {} products, {} still in flight: {}",
                    products.len(),
                    total,
                    tasks.len(),
                    e
                );
                tasks.detach_all();
                return Err(e);
            }
        }
    }

    Ok(products)
}
