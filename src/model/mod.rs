//! Crawl data model
//!
//! - `CategoryNode` / `CategoryTree`: the category hierarchy
//! - `ProductRefs`: deduplicated product URLs collected from listing pages
//! - `ProductDetail`: one harvested product record
//! - `CrawlResult`: the aggregate handed to persistence

mod category;
mod product;

pub use category::{CategoryNode, CategoryTree};
pub use product::{CollectionItem, ProductDetail, ProductOptions, ProductRefs};

use serde::Serialize;

/// Everything a successful crawl produces
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub hierarchy: CategoryTree,

    /// Harvested products; order is unspecified
    pub products: Vec<ProductDetail>,
}
