//! End-to-end crawls against mock shops
//!
//! These tests use wiremock to serve a WooCommerce-like storefront and drive
//! the full crawl through the HTTP browser. Request counts are verified by
//! each mock's `expect` when the server drops.

use crate::fixtures::{listing_page, mount_forbidden_assets, mount_page, mount_shop, product_page, test_config};
use shop_scrape::browser::{Browser, HttpBrowser, PageSession, RequestFilter};
use shop_scrape::config::{CrawlerConfig, UserAgentConfig};
use shop_scrape::extract::{extractor_for, ExtractorKind};
use shop_scrape::output::{write_artifacts, HIERARCHY_FILE, PRODUCTS_FILE};
use shop_scrape::{scrape, Coordinator, CrawlStage, ExtractError, ScrapeError};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_scrape() {
    let server = MockServer::start().await;
    mount_shop(&server).await;
    let config = test_config(&server.uri(), 2);

    let result = scrape(&config, &server.uri()).await.expect("scrape should succeed");

    assert_eq!(result.hierarchy.roots.len(), 2);
    assert_eq!(result.hierarchy.node_count(), 3);
    assert_eq!(result.hierarchy.roots[0].label, "Clothing");
    assert_eq!(result.hierarchy.roots[0].children[0].label, "Hoodies");

    assert_eq!(result.products.len(), 3);
    let mut skus: Vec<_> = result.products.iter().map(|p| p.sku.clone()).collect();
    skus.sort();
    assert_eq!(skus, vec!["album", "cap", "hoodie"]);

    let hoodie = result
        .products
        .iter()
        .find(|p| p.sku == "hoodie")
        .unwrap();
    assert_eq!(hoodie.url, format!("{}/product/hoodie/", server.uri()));
    assert_eq!(hoodie.title, "Product hoodie");
    assert_eq!(hoodie.price, "$18.00");
    assert_eq!(hoodie.category, "Clothing");
    assert_eq!(hoodie.description, "All about hoodie.");
    assert!(hoodie.related_skus.is_none());
    assert!(hoodie.options.is_empty());
}

#[tokio::test]
async fn test_artifacts_written_for_host() {
    let server = MockServer::start().await;
    mount_shop(&server).await;
    let config = test_config(&server.uri(), 4);
    let output = TempDir::new().unwrap();

    let result = scrape(&config, &server.uri()).await.unwrap();
    let dir = write_artifacts(&result, output.path(), "127.0.0.1").unwrap();

    let hierarchy: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join(HIERARCHY_FILE)).unwrap()).unwrap();
    assert_eq!(hierarchy[0]["category"], "Clothing");
    assert_eq!(hierarchy[0]["url"], "/product-category/clothing/");
    assert_eq!(hierarchy[0]["childrens"][0]["category"], "Hoodies");
    assert_eq!(hierarchy[1]["childrens"].as_array().unwrap().len(), 0);

    let products = std::fs::read_to_string(dir.join(PRODUCTS_FILE)).unwrap();
    assert!(products.contains("\n  {\n    \"url\""));
    let products: serde_json::Value = serde_json::from_str(&products).unwrap();
    assert_eq!(products.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_single_session_crawl() {
    let server = MockServer::start().await;
    mount_shop(&server).await;
    let config = test_config(&server.uri(), 1);

    let result = scrape(&config, &server.uri()).await.unwrap();
    assert_eq!(result.products.len(), 3);
}

#[tokio::test]
async fn test_requests_identify_crawler() {
    let server = MockServer::start().await;
    let user_agent = UserAgentConfig::default().header_value();
    Mock::given(method("GET"))
        .and(header("user-agent", user_agent.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), 2);
    let result = scrape(&config, &server.uri()).await.unwrap();
    assert!(result.products.is_empty());
    assert_eq!(result.hierarchy.node_count(), 3);
}

#[tokio::test]
async fn test_pagination_cycle_stops() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        listing_page(&["/product/hoodie/"], Some("/page/2/")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/page/2/",
        listing_page(&["/product/cap/"], Some("/")),
        1,
    )
    .await;
    mount_page(&server, "/product/hoodie/", product_page("hoodie", true), 1).await;
    mount_page(&server, "/product/cap/", product_page("cap", true), 1).await;
    mount_forbidden_assets(&server).await;

    let config = test_config(&server.uri(), 2);
    let result = scrape(&config, &server.uri()).await.unwrap();
    assert_eq!(result.products.len(), 2);
}

#[tokio::test]
async fn test_missing_title_fails_scrape() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        listing_page(&["/product/hoodie/", "/product/broken/"], None),
        1,
    )
    .await;
    mount_page(&server, "/product/hoodie/", product_page("hoodie", true), 1).await;
    mount_page(&server, "/product/broken/", product_page("broken", false), 1).await;

    let config = test_config(&server.uri(), 2);
    let result = scrape(&config, &server.uri()).await;

    match result {
        Err(ScrapeError::Extraction { url, source }) => {
            assert!(url.ends_with("/product/broken/"));
            assert!(matches!(source, ExtractError::MissingField { field: "title", .. }));
        }
        Err(other) => panic!("expected extraction error, got {}", other),
        Ok(_) => panic!("expected the scrape to fail"),
    }
}

#[tokio::test]
async fn test_product_not_found_fails_scrape() {
    let server = MockServer::start().await;
    mount_page(&server, "/", listing_page(&["/product/gone/"], None), 1).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), 2);
    let result = scrape(&config, &server.uri()).await;

    match result {
        Err(ScrapeError::Navigation { reason, .. }) => assert_eq!(reason, "HTTP 404"),
        Err(other) => panic!("expected navigation error, got {}", other),
        Ok(_) => panic!("expected the scrape to fail"),
    }
}

#[tokio::test]
async fn test_coordinator_closes_http_browser() {
    let server = MockServer::start().await;
    mount_shop(&server).await;

    let browser = HttpBrowser::launch(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
    let mut coordinator = Coordinator::new(
        browser.clone(),
        extractor_for(ExtractorKind::WooCommerce),
        &CrawlerConfig::default(),
    );
    let entry = Url::parse(&server.uri()).unwrap();

    coordinator.run(&entry).await.unwrap();

    assert_eq!(coordinator.stage(), CrawlStage::Done);
    assert!(browser.is_closed());
    assert!(matches!(browser.new_session().await, Err(ScrapeError::BrowserClosed)));

    let stats = coordinator.stats();
    assert_eq!(stats.listing_pages, 2);
    assert_eq!(stats.product_refs, 3);
    assert_eq!(stats.sessions_opened, 4);
    assert!(stats.requests_aborted > 0);
}

#[tokio::test]
async fn test_document_only_session_aborts_subresources() {
    let server = MockServer::start().await;
    mount_page(&server, "/product/cap/", product_page("cap", true), 1).await;
    mount_forbidden_assets(&server).await;

    let browser = HttpBrowser::launch(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
    let mut session = browser.new_session().await.unwrap();
    session.set_request_filter(RequestFilter::document_only());

    let url = Url::parse(&format!("{}/product/cap/", server.uri())).unwrap();
    session.navigate(&url).await.unwrap();
    let page = session.current_page().unwrap();
    assert_eq!(page.status_code, 200);
    assert_eq!(page.url, url);

    let stats = session.request_stats();
    assert_eq!(stats.allowed, 1);
    // stylesheet, script, and the gallery image
    assert_eq!(stats.aborted, 3);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_unsupported_site_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config("https://demo-shop.natek.eu", 2);
    let result = scrape(&config, &server.uri()).await;
    assert!(matches!(result, Err(ScrapeError::UnsupportedSite { .. })));
}
