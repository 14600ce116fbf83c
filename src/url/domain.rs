use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shop_scrape::url::extract_host;
///
/// let url = Url::parse("https://Demo-Shop.example.com:8443/shop/").unwrap();
/// assert_eq!(extract_host(&url), Some("demo-shop.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
