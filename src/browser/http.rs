//! HTTP-backed browsing engine
//!
//! This module handles:
//! - Building the shared HTTP client with the configured user agent
//! - Loading top-level documents for a session
//! - Offering each subresource a document references to the request filter

use super::{Browser, LoadedPage, PageSession, RequestDecision, RequestFilter, RequestStats, ResourceType};
use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::ScrapeError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Subresource selectors and the resource type each one loads
const SUBRESOURCE_SELECTORS: &[(&str, &str, ResourceType)] = &[
    ("link[rel~='stylesheet'][href]", "href", ResourceType::Stylesheet),
    ("link[rel='preload'][as='font'][href]", "href", ResourceType::Font),
    ("img[src]", "src", ResourceType::Image),
    ("script[src]", "src", ResourceType::Script),
    ("video[src], audio[src], source[src]", "src", ResourceType::Media),
];

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Supplies the navigation timeout
/// * `user_agent` - Identification sent with every request
///
/// # Example
///
/// ```no_run
/// use shop_scrape::browser::build_http_client;
/// use shop_scrape::config::{CrawlerConfig, UserAgentConfig};
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_millis(crawler.navigation_timeout_ms))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Browser whose sessions share one HTTP client
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
    closed: Arc<AtomicBool>,
}

impl HttpBrowser {
    /// Starts the engine
    pub fn launch(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, ScrapeError> {
        let client = build_http_client(crawler, user_agent)?;
        tracing::debug!("HTTP browser launched");
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    type Session = HttpSession;

    async fn new_session(&self) -> Result<HttpSession, ScrapeError> {
        if self.is_closed() {
            return Err(ScrapeError::BrowserClosed);
        }
        Ok(HttpSession {
            client: self.client.clone(),
            browser_closed: Arc::clone(&self.closed),
            filter: RequestFilter::allow_all(),
            page: None,
            stats: RequestStats::default(),
            closed: false,
        })
    }

    async fn close(&self) -> Result<(), ScrapeError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("HTTP browser closed");
        }
        Ok(())
    }
}

/// One page of an `HttpBrowser`
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    browser_closed: Arc<AtomicBool>,
    filter: RequestFilter,
    page: Option<LoadedPage>,
    stats: RequestStats,
    closed: bool,
}

impl HttpSession {
    /// Offers a request to the filter, updating the counters
    fn admit(&mut self, resource_type: ResourceType, url: &Url) -> bool {
        match self.filter.decide(resource_type, url) {
            RequestDecision::Continue => {
                self.stats.allowed += 1;
                true
            }
            RequestDecision::Abort => {
                self.stats.aborted += 1;
                false
            }
        }
    }

    /// Issues the subresource requests a document would trigger
    ///
    /// Failures are logged and ignored; they never fail the navigation.
    async fn load_subresources(&mut self, requests: Vec<(ResourceType, Url)>) {
        for (resource_type, url) in requests {
            if !self.admit(resource_type, &url) {
                continue;
            }
            if let Err(e) = self.client.get(url.clone()).send().await {
                tracing::debug!("{} request {} failed: {}", resource_type, url, e);
            }
        }
    }
}

#[async_trait]
impl PageSession for HttpSession {
    async fn navigate(&mut self, url: &Url) -> Result<(), ScrapeError> {
        if self.closed || self.browser_closed.load(Ordering::SeqCst) {
            return Err(ScrapeError::BrowserClosed);
        }

        if !self.admit(ResourceType::Document, url) {
            return Err(ScrapeError::RequestAborted {
                url: url.to_string(),
            });
        }

        tracing::debug!("Navigating to {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ScrapeError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|source| ScrapeError::Http {
            url: url.to_string(),
            source,
        })?;

        let requests = {
            let document = Html::parse_document(&body);
            subresource_requests(&document, &final_url)
        };
        self.load_subresources(requests).await;

        tracing::debug!("Loaded {} (HTTP {}, {} bytes)", final_url, status.as_u16(), body.len());
        self.page = Some(LoadedPage {
            url: final_url,
            status_code: status.as_u16(),
            body,
        });
        Ok(())
    }

    fn current_page(&self) -> Option<&LoadedPage> {
        self.page.as_ref()
    }

    fn set_request_filter(&mut self, filter: RequestFilter) {
        self.filter = filter;
    }

    fn request_stats(&self) -> RequestStats {
        self.stats
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        self.closed = true;
        self.page = None;
        Ok(())
    }
}

/// Lists the subresources a document references, resolved to absolute URLs
///
/// `javascript:` and `data:` references and unparsable URLs are skipped.
pub(crate) fn subresource_requests(document: &Html, base_url: &Url) -> Vec<(ResourceType, Url)> {
    let mut requests = Vec::new();

    for (selector, attribute, resource_type) in SUBRESOURCE_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(reference) = element.value().attr(attribute) else {
                continue;
            };
            if let Some(url) = resolve_reference(reference, base_url) {
                requests.push((*resource_type, url));
            }
        }
    }

    requests
}

fn resolve_reference(reference: &str, base_url: &Url) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with("data:") || reference.starts_with("javascript:") {
        return None;
    }

    base_url
        .join(reference)
        .ok()
        .filter(|url| url.scheme() == "http" || url.scheme() == "https")
}
