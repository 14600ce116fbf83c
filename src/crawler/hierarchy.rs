//! Category hierarchy walk
//!
//! The whole tree is read from the page already loaded in the session; the
//! walk never navigates.

use crate::browser::PageSession;
use crate::extract::{Extractor, HierarchyScope};
use crate::model::{CategoryNode, CategoryTree};
use crate::{ExtractResult, Result, ScrapeError};
use tracing::{debug, warn};

/// Reads the category tree from the session's current page
pub async fn walk<S: PageSession>(session: &S, extractor: &dyn Extractor) -> Result<CategoryTree> {
    let page_url = session
        .current_page()
        .map(|page| page.url.to_string())
        .ok_or(ScrapeError::NoPageLoaded)?;

    let roots = session
        .evaluate(|document, _| collect_nodes(extractor, HierarchyScope::Document(document)))
        .await?
        .map_err(|source| ScrapeError::Extraction {
            url: page_url.clone(),
            source,
        })?;

    let tree = CategoryTree::new(roots);
    if tree.is_empty() {
        warn!("Category list on {} is empty", page_url);
        return Ok(tree);
    }
    debug!(
        "Read {} categories ({} levels) from {}",
        tree.node_count(),
        tree.depth(),
        page_url
    );
    Ok(tree)
}

fn collect_nodes(extractor: &dyn Extractor, scope: HierarchyScope<'_>) -> ExtractResult<Vec<CategoryNode>> {
    let mut nodes = Vec::new();
    for entry in extractor.hierarchy_entries(scope)? {
        let children = match entry.children {
            Some(list) => collect_nodes(extractor, HierarchyScope::Subtree(list))?,
            None => Vec::new(),
        };
        nodes.push(CategoryNode {
            url: entry.url,
            label: entry.label,
            children,
        });
    }
    Ok(nodes)
}
