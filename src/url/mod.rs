//! URL handling module for Shop-Scrape
//!
//! Canonical product keys and host extraction for artifact directories.

mod domain;
mod normalize;

pub use domain::extract_host;
pub use normalize::canonicalize;

use crate::UrlError;
use url::Url;

/// Parses a crawl entry URL given on the command line
///
/// Only absolute HTTP(S) URLs with a host are accepted.
pub fn parse_entry_url(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
