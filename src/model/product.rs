use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use url::Url;

/// Set of product URLs discovered while paging through the listing
///
/// Keyed by canonical URL: a product seen on several listing pages is held
/// once.
#[derive(Debug, Clone, Default)]
pub struct ProductRefs {
    urls: HashSet<Url>,
}

impl ProductRefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL, returning false if it was already known
    pub fn insert(&mut self, url: Url) -> bool {
        self.urls.insert(url)
    }

    /// Merges every URL from one listing page
    ///
    /// Returns how many of them were new.
    pub fn merge<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = Url>,
    {
        let mut added = 0;
        for url in urls {
            if self.urls.insert(url) {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl IntoIterator for ProductRefs {
    type Item = Url;
    type IntoIter = std::collections::hash_set::IntoIter<Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.into_iter()
    }
}

impl FromIterator<Url> for ProductRefs {
    fn from_iter<T: IntoIterator<Item = Url>>(iter: T) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}

/// A harvested product detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub url: String,
    pub image_url: String,
    pub title: String,

    /// Displayed price; the reduced price when the product is on sale
    pub price: String,

    #[serde(rename = "SKU")]
    pub sku: String,

    pub category: String,
    pub description: String,

    /// SKUs of the "related products" section, absent when the page has none
    #[serde(
        rename = "relatedSKUs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub related_skus: Option<Vec<String>>,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub options: ProductOptions,
}

/// Purchasable variants of a product
///
/// Every group is independent: a page may carry any subset of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<BTreeMap<String, CollectionItem>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<Vec<String>>,
}

impl ProductOptions {
    pub fn is_empty(&self) -> bool {
        self.collection.is_none() && self.color.is_none() && self.size.is_none() && self.logo.is_none()
    }
}

/// One member product of a grouped product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub url: String,
    pub price: String,
}
