use crate::UrlError;
use url::Url;

/// Query parameters that never change which page is served
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid", "_ga"];

/// Resolves `href` against `base` and reduces it to the canonical form used as
/// a product key
///
/// # Normalization Steps
///
/// 1. Resolve relative references against the page URL
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Remove the fragment (everything after #)
/// 4. Remove tracking query parameters (`utm_*`, `fbclid`, ...)
/// 5. Sort remaining query parameters by key
/// 6. Remove an empty query string (trailing ?)
///
/// Host case is already folded by the URL parser. Path and trailing slash are
/// kept as-is: shop permalinks are slash-terminated and the server treats the
/// two spellings as different resources.
///
/// # Examples
///
/// ```
/// use shop_scrape::url::canonicalize;
/// use url::Url;
///
/// let base = Url::parse("https://Shop.Example.com/shop/").unwrap();
/// let url = canonicalize("/product/mug/?utm_source=x#reviews", &base).unwrap();
/// assert_eq!(url.as_str(), "https://shop.example.com/product/mug/");
/// ```
pub fn canonicalize(href: &str, base: &Url) -> Result<Url, UrlError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    let mut url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    Ok(url)
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
