//! Storefront markup served by the mock shops

use shop_scrape::config::{Config, CrawlerConfig, SiteEntry};
use shop_scrape::extract::ExtractorKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Assets every page references; none of them may ever be fetched
pub const ASSET_PATHS: &[&str] = &["/assets/style.css", "/assets/app.js", "/assets/banner.jpg"];

const HEAD: &str = r#"<head>
  <link rel="stylesheet" href="/assets/style.css">
  <script src="/assets/app.js"></script>
</head>"#;

const CATEGORIES: &str = r#"<aside><ul class="product-categories">
  <li class="cat-item cat-parent"><a href="/product-category/clothing/">Clothing</a>
    <ul class="children">
      <li class="cat-item"><a href="/product-category/clothing/hoodies/">Hoodies</a></li>
    </ul>
  </li>
  <li class="cat-item"><a href="/product-category/music/">Music</a></li>
</ul></aside>"#;

pub fn test_config(site_url: &str, sessions: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_sessions: sessions,
            navigation_timeout_ms: 5_000,
        },
        sites: vec![SiteEntry {
            url: site_url.to_string(),
            extractor: ExtractorKind::WooCommerce,
        }],
        ..Default::default()
    }
}

/// A shop listing page with the category widget in its sidebar
pub fn listing_page(product_paths: &[&str], next: Option<&str>) -> String {
    let items: String = product_paths
        .iter()
        .map(|p| format!(r#"<li class="product"><a href="{p}"><img src="/assets/banner.jpg"><h2>{p}</h2></a></li>"#))
        .collect();
    let pagination = next
        .map(|href| {
            format!(
                r#"<nav class="woocommerce-pagination"><ul class="page-numbers">
                   <li><a class="next page-numbers" href="{href}">→</a></li></ul></nav>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html>{HEAD}<body>{CATEGORIES}<main><ul class="products">{items}</ul>{pagination}</main></body></html>"#
    )
}

/// A single-product page; `with_title` false drops the required title
pub fn product_page(sku: &str, with_title: bool) -> String {
    let title = if with_title {
        format!(r#"<h1 class="product_title entry-title">Product {sku}</h1>"#)
    } else {
        String::new()
    };
    format!(
        r#"<html>{HEAD}<body><div class="product">
          <div class="woocommerce-product-gallery"><figure><a href="/uploads/{sku}.jpg"><img src="/assets/banner.jpg"></a></figure></div>
          <div class="summary">{title}
            <p class="price"><span class="woocommerce-Price-amount amount"><bdi><span>$</span>18.00</bdi></span></p>
            <div class="product_meta">
              <span class="sku_wrapper">SKU: <span class="sku">{sku}</span></span>
              <span class="posted_in">Category: <a href="/product-category/clothing/">Clothing</a></span>
            </div>
          </div>
          <div class="woocommerce-Tabs-panel woocommerce-Tabs-panel--description"><p>All about {sku}.</p></div>
        </div></body></html>"#
    )
}

/// Serves `body` at `page_path`, expecting exactly `hits` requests
pub async fn mount_page(server: &MockServer, page_path: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(hits)
        .mount(server)
        .await;
}

/// Serves the assets while asserting they are never requested
pub async fn mount_forbidden_assets(server: &MockServer) {
    for asset in ASSET_PATHS {
        Mock::given(method("GET"))
            .and(path(*asset))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }
}

/// Two listing pages sharing one product, three products in total
pub async fn mount_shop(server: &MockServer) {
    mount_page(
        server,
        "/",
        listing_page(&["/product/hoodie/", "/product/album/"], Some("/page/2/")),
        1,
    )
    .await;
    mount_page(
        server,
        "/page/2/",
        listing_page(&["/product/album/", "/product/cap/"], None),
        1,
    )
    .await;
    for sku in ["hoodie", "album", "cap"] {
        mount_page(server, &format!("/product/{sku}/"), product_page(sku, true), 1).await;
    }
    mount_forbidden_assets(server).await;
}
