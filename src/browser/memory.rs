//! In-memory engine for unit tests
//!
//! Serves documents from a URL → markup map and records every navigation.

use super::{Browser, LoadedPage, PageSession, RequestDecision, RequestFilter, ResourceType};
use crate::ScrapeError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Default)]
struct Shared {
    pages: HashMap<String, String>,
    navigations: Mutex<Vec<String>>,
    open_sessions: AtomicUsize,
    peak_sessions: AtomicUsize,
    sessions_created: AtomicUsize,
    close_calls: AtomicUsize,
    latency: Duration,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryBrowser {
    shared: Arc<Shared>,
}

impl MemoryBrowser {
    pub(crate) fn new<I, K, V>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_latency(pages, Duration::ZERO)
    }

    /// Every navigation sleeps for `latency` before completing
    pub(crate) fn with_latency<I, K, V>(pages: I, latency: Duration) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pages = pages
            .into_iter()
            .map(|(url, body)| (url.into(), body.into()))
            .collect();
        Self {
            shared: Arc::new(Shared {
                pages,
                latency,
                ..Default::default()
            }),
        }
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.shared.navigations.lock().unwrap().clone()
    }

    pub(crate) fn navigation_count(&self, url: &str) -> usize {
        self.navigations().iter().filter(|u| u.as_str() == url).count()
    }

    pub(crate) fn open_sessions(&self) -> usize {
        self.shared.open_sessions.load(Ordering::SeqCst)
    }

    pub(crate) fn peak_sessions(&self) -> usize {
        self.shared.peak_sessions.load(Ordering::SeqCst)
    }

    pub(crate) fn sessions_created(&self) -> usize {
        self.shared.sessions_created.load(Ordering::SeqCst)
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.shared.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for MemoryBrowser {
    type Session = MemorySession;

    async fn new_session(&self) -> Result<MemorySession, ScrapeError> {
        if self.close_calls() > 0 {
            return Err(ScrapeError::BrowserClosed);
        }
        self.shared.sessions_created.fetch_add(1, Ordering::SeqCst);
        let open = self.shared.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.peak_sessions.fetch_max(open, Ordering::SeqCst);
        Ok(MemorySession {
            shared: Arc::clone(&self.shared),
            filter: RequestFilter::allow_all(),
            page: None,
            closed: false,
        })
    }

    async fn close(&self) -> Result<(), ScrapeError> {
        self.shared.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct MemorySession {
    shared: Arc<Shared>,
    filter: RequestFilter,
    page: Option<LoadedPage>,
    closed: bool,
}

#[async_trait]
impl PageSession for MemorySession {
    async fn navigate(&mut self, url: &Url) -> Result<(), ScrapeError> {
        if self.closed {
            return Err(ScrapeError::BrowserClosed);
        }
        if self.filter.decide(ResourceType::Document, url) == RequestDecision::Abort {
            return Err(ScrapeError::RequestAborted {
                url: url.to_string(),
            });
        }

        self.shared
            .navigations
            .lock()
            .unwrap()
            .push(url.to_string());

        if !self.shared.latency.is_zero() {
            tokio::time::sleep(self.shared.latency).await;
        }

        let body = self
            .shared
            .pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ScrapeError::Navigation {
                url: url.to_string(),
                reason: "HTTP 404".to_string(),
            })?;

        self.page = Some(LoadedPage {
            url: url.clone(),
            status_code: 200,
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

    async fn close(&mut self) -> Result<(), ScrapeError> {
        if !self.closed {
            self.closed = true;
            self.shared.open_sessions.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
