//! Extraction rules for WooCommerce storefronts
//!
//! Markup handled here:
//! - Category widget: `ul.product-categories`, parents tagged `cat-parent`
//!   with a nested `ul.children`
//! - Listing: `ul.products` items plus the `ul.page-numbers a.next` link
//! - Product page: the single-product template with its meta block,
//!   description tab, attribute table, grouped-product table, variation
//!   selects and the related-products section

use super::dom::{all, attr, element_children, first, first_attr, first_text, text_of};
use super::{DetailRecordBuilder, Extractor, HierarchyEntry, HierarchyScope, ListingPage};
use crate::model::{CollectionItem, ProductDetail, ProductOptions};
use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use url::Url;

const CATEGORY_ROOT: &str = "ul.product-categories";
const CATEGORY_CHILDREN: &str = "ul.children";
const PARENT_CLASS: &str = "cat-parent";

const PRODUCT_LIST: &str = "ul.products";
const NEXT_PAGE: &str = "ul.page-numbers a.next";

const IMAGE: &str = ".product figure a";
const TITLE: &str = ".product_title";
const PRICE: &str = "p.price";
const SALE_PRICE: &str = "p.price ins span.amount bdi";
const SKU: &str = ".product_meta .sku";
const CATEGORY: &str = ".product_meta .posted_in a";
const DESCRIPTION: &str = ".woocommerce-Tabs-panel--description p";
const RELATED: &str = "section.related ul.products";
const RELATED_BUTTON: &str = ".add_to_cart_button";
const ATTRIBUTE_ROW: &str = "tr.woocommerce-product-attributes-item";
const GROUPED_ROW: &str = "tr.woocommerce-grouped-product-list-item";
const GROUPED_LINK: &str = ".woocommerce-grouped-product-list-item__label label a";
const GROUPED_PRICE: &str = ".woocommerce-grouped-product-list-item__price";
const GROUPED_SALE_PRICE: &str = ".woocommerce-grouped-product-list-item__price ins";
const COLOR_SELECT: &str = "#pa_color";
const SIZE_SELECT: &str = "#pa_size";
const LOGO_SELECT: &str = "#logo";

#[derive(Debug, Clone, Default)]
pub struct WooCommerceExtractor;

impl WooCommerceExtractor {
    pub fn new() -> Self {
        Self
    }

    fn related_skus(&self, root: ElementRef<'_>) -> ExtractResult<Vec<String>> {
        let section = first(root, RELATED)?;
        Ok(all(section, RELATED_BUTTON)?
            .into_iter()
            .filter_map(|button| button.value().attr("data-product_sku"))
            .map(str::to_string)
            .collect())
    }

    /// Name/value rows of the additional-information table
    ///
    /// A row missing its header or value is skipped; the other rows are kept.
    fn attributes(&self, root: ElementRef<'_>) -> ExtractResult<BTreeMap<String, String>> {
        let mut attributes = BTreeMap::new();
        for row in all(root, ATTRIBUTE_ROW)? {
            let name_and_value = first_text(row, "th")
                .and_then(|name| first_text(row, "td p").map(|value| (name, value)));
            match name_and_value {
                Ok((name, value)) => {
                    attributes.insert(name, value);
                }
                Err(e) => tracing::trace!("Skipping attribute row: {}", e),
            }
        }
        Ok(attributes)
    }

    /// Grouped-product rows keyed by member name
    ///
    /// Malformed rows are skipped. The group is absent only when no row can
    /// be read at all.
    fn collection(&self, root: ElementRef<'_>) -> ExtractResult<BTreeMap<String, CollectionItem>> {
        let mut collection = BTreeMap::new();
        for row in all(root, GROUPED_ROW)? {
            match self.collection_item(row) {
                Ok((name, item)) => {
                    collection.insert(name, item);
                }
                Err(e) => tracing::trace!("Skipping grouped product row: {}", e),
            }
        }

        if collection.is_empty() {
            return Err(ExtractError::MissingElement {
                selector: GROUPED_ROW.to_string(),
            });
        }
        Ok(collection)
    }

    fn collection_item(&self, row: ElementRef<'_>) -> ExtractResult<(String, CollectionItem)> {
        let link = first(row, GROUPED_LINK)?;
        let url = attr(link, GROUPED_LINK, "href")?;
        let price = match first_text(row, GROUPED_SALE_PRICE) {
            Ok(reduced) => reduced,
            Err(_) => first_text(row, GROUPED_PRICE)?,
        };
        Ok((text_of(link), CollectionItem { url, price }))
    }

    /// Non-empty option values of a variation `<select>`
    fn select_values(&self, root: ElementRef<'_>, css: &str) -> ExtractResult<Vec<String>> {
        let select = first(root, css)?;
        Ok(element_children(select)
            .filter_map(|option| option.value().attr("value"))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl Extractor for WooCommerceExtractor {
    fn hierarchy_entries<'a>(&self, scope: HierarchyScope<'a>) -> ExtractResult<Vec<HierarchyEntry<'a>>> {
        let list = match scope {
            HierarchyScope::Document(document) => first(document.root_element(), CATEGORY_ROOT)?,
            HierarchyScope::Subtree(list) => list,
        };

        let mut entries = Vec::new();
        for item in element_children(list) {
            let anchor = first(item, "a")?;
            let children = if item.value().classes().any(|class| class == PARENT_CLASS) {
                Some(first(item, CATEGORY_CHILDREN)?)
            } else {
                None
            };
            entries.push(HierarchyEntry {
                url: attr(anchor, "a", "href")?,
                label: text_of(anchor),
                children,
            });
        }
        Ok(entries)
    }

    fn listing_page(&self, document: &Html, _page_url: &Url) -> ExtractResult<ListingPage> {
        let root = document.root_element();
        let list = first(root, PRODUCT_LIST)?;

        let mut product_hrefs = Vec::new();
        for item in element_children(list) {
            product_hrefs.push(first_attr(item, "a", "href")?);
        }

        let next_page_href = first(root, NEXT_PAGE)
            .ok()
            .and_then(|anchor| anchor.value().attr("href"))
            .map(str::to_string);

        Ok(ListingPage {
            product_hrefs,
            next_page_href,
        })
    }

    fn product_detail(&self, document: &Html, url: &Url) -> ExtractResult<ProductDetail> {
        let root = document.root_element();
        let mut record = DetailRecordBuilder::new(url);

        let image_url = record.required("imageUrl", first_attr(root, IMAGE, "href"))?;
        let title = record.required("title", first_text(root, TITLE))?;
        let regular_price = record.required("price", first_text(root, PRICE))?;
        let sku = record.required("SKU", first_text(root, SKU))?;
        let category = record.required("category", first_text(root, CATEGORY))?;
        let description = record.required("description", first_text(root, DESCRIPTION))?;

        let price = record
            .optional("salePrice", first_text(root, SALE_PRICE))
            .unwrap_or(regular_price);
        let related_skus = record.optional("relatedSKUs", self.related_skus(root));
        let attributes = record
            .optional("attributes", self.attributes(root))
            .unwrap_or_default();
        let options = ProductOptions {
            collection: record.optional("collection", self.collection(root)),
            color: record.optional("color", self.select_values(root, COLOR_SELECT)),
            size: record.optional("size", self.select_values(root, SIZE_SELECT)),
            logo: record.optional("logo", self.select_values(root, LOGO_SELECT)),
        };

        if !record.absent_fields().is_empty() {
            tracing::trace!("{}: absent optional fields {:?}", url, record.absent_fields());
        }

        Ok(ProductDetail {
            url: record.url().to_string(),
            image_url,
            title,
            price,
            sku,
            category,
            description,
            related_skus,
            attributes,
            options,
        })
    }
}
