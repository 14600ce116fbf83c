//! Browsing engine capability
//!
//! The crawler never talks to an engine directly. It goes through two traits:
//!
//! - `Browser`: one underlying browser process that hands out sessions
//! - `PageSession`: one navigable page with a single current location
//!
//! `HttpBrowser` is the bundled engine. It loads top-level documents over
//! HTTP and offers their subresource requests to the session's
//! `RequestFilter`.

mod filter;
mod http;
#[cfg(test)]
pub(crate) mod memory;

pub use filter::{RequestDecision, RequestFilter, ResourceType};
pub use http::{build_http_client, HttpBrowser, HttpSession};

use crate::ScrapeError;
use async_trait::async_trait;
use scraper::Html;
use url::Url;

/// A document currently loaded in a session
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// Final URL after redirects
    pub url: Url,

    /// HTTP status code of the document response
    pub status_code: u16,

    /// Raw document markup
    pub body: String,
}

impl LoadedPage {
    /// Parses the document and runs `extractor` against it
    ///
    /// The parsed DOM lives only for the duration of the call.
    pub fn evaluate<T, F>(&self, extractor: F) -> T
    where
        F: FnOnce(&Html, &Url) -> T,
    {
        let document = Html::parse_document(&self.body);
        extractor(&document, &self.url)
    }
}

/// Per-session counters of requests offered to the request filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStats {
    pub allowed: u64,
    pub aborted: u64,
}

/// One underlying browser process
#[async_trait]
pub trait Browser: Send + Sync + 'static {
    type Session: PageSession;

    /// Opens a fresh session with no page loaded
    async fn new_session(&self) -> Result<Self::Session, ScrapeError>;

    /// Shuts the browser down; sessions opened afterwards fail
    async fn close(&self) -> Result<(), ScrapeError>;
}

/// A scoped browsing context with one current page
#[async_trait]
pub trait PageSession: Send + Sync + 'static {
    /// Loads `url` as the session's current page, replacing the previous one
    async fn navigate(&mut self, url: &Url) -> Result<(), ScrapeError>;

    /// The page loaded by the last successful navigation
    fn current_page(&self) -> Option<&LoadedPage>;

    /// Installs the policy consulted for every outgoing request
    fn set_request_filter(&mut self, filter: RequestFilter);

    fn request_stats(&self) -> RequestStats {
        RequestStats::default()
    }

    /// Releases the session's engine resources
    async fn close(&mut self) -> Result<(), ScrapeError>;

    /// Runs `extractor` against the currently loaded page
    async fn evaluate<T, F>(&self, extractor: F) -> Result<T, ScrapeError>
    where
        F: FnOnce(&Html, &Url) -> T + Send,
        T: Send,
    {
        let page = self.current_page().ok_or(ScrapeError::NoPageLoaded)?;
        Ok(page.evaluate(extractor))
    }
}
