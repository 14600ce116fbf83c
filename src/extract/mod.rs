//! Site extraction rules
//!
//! An `Extractor` turns the DOM of whatever page a session has loaded into
//! crawl data. Extractors never navigate; the crawler decides where the
//! session goes and asks the extractor what is on the page.
//!
//! Rules are site-specific and swappable. `ExtractorKind` names the bundled
//! implementations so a config file can pick one per site.

mod dom;
mod record;
mod woocommerce;

pub use dom::{attr, first, first_attr, first_text, text_of};
pub use record::DetailRecordBuilder;
pub use woocommerce::WooCommerceExtractor;

use crate::model::ProductDetail;
use crate::ExtractResult;
use scraper::{ElementRef, Html};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Where in the DOM a hierarchy lookup starts
#[derive(Debug, Clone, Copy)]
pub enum HierarchyScope<'a> {
    /// The site's top-level category list
    Document(&'a Html),

    /// A nested category list returned by an earlier lookup
    Subtree(ElementRef<'a>),
}

/// One category entry as it appears in the page
#[derive(Debug, Clone)]
pub struct HierarchyEntry<'a> {
    pub url: String,
    pub label: String,

    /// Nested list of sub-categories, present for parent categories
    pub children: Option<ElementRef<'a>>,
}

/// What one listing page offers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Product links as written in the page (may be relative)
    pub product_hrefs: Vec<String>,

    /// Link to the following listing page, if any
    pub next_page_href: Option<String>,
}

/// Site-specific extraction rules
pub trait Extractor: Send + Sync + 'static {
    /// Lists the category entries directly under `scope`, in page order
    fn hierarchy_entries<'a>(&self, scope: HierarchyScope<'a>) -> ExtractResult<Vec<HierarchyEntry<'a>>>;

    /// Reads the product links and the next-page link of a listing page
    fn listing_page(&self, document: &Html, page_url: &Url) -> ExtractResult<ListingPage>;

    /// Builds the detail record of a product page
    ///
    /// Fails only when a required field is missing; optional groups that
    /// cannot be read are left absent.
    fn product_detail(&self, document: &Html, url: &Url) -> ExtractResult<ProductDetail>;
}

/// Bundled extractor implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// WordPress + WooCommerce storefront markup
    WooCommerce,
}

/// Instantiates the extractor for `kind`
pub fn extractor_for(kind: ExtractorKind) -> Arc<dyn Extractor> {
    match kind {
        ExtractorKind::WooCommerce => Arc::new(WooCommerceExtractor::new()),
    }
}
