//! Bounded pool of browsing sessions
//!
//! Sessions are opened on demand and closed on release; the pool never keeps
//! idle sessions around. A semaphore caps how many can be open at once, and
//! every session gets the pool's request filter installed before it is
//! handed out.

use crate::browser::{Browser, PageSession, RequestFilter};
use crate::{Result, ScrapeError};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

/// Sessions drawn from a single shared browser
pub struct SessionPool<B: Browser> {
    browser: B,
    permits: Arc<Semaphore>,
    capacity: u32,
    filter: RequestFilter,
    opened: AtomicUsize,
    released: AtomicUsize,
    requests_aborted: AtomicU64,
    shut_down: AtomicBool,
}

impl<B: Browser> SessionPool<B> {
    /// Creates a pool allowing at most `capacity` open sessions
    ///
    /// A capacity of zero is raised to one.
    pub fn new(browser: B, capacity: u32, filter: RequestFilter) -> Self {
        let capacity = capacity.max(1);
        Self {
            browser,
            permits: Arc::new(Semaphore::new(capacity as usize)),
            capacity,
            filter,
            opened: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
            requests_aborted: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Waits for a free slot and opens a fresh session in it
    pub async fn acquire(self: &Arc<Self>) -> Result<PooledSession<B>> {
        if self.is_shut_down() {
            return Err(ScrapeError::BrowserClosed);
        }

        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ScrapeError::SessionPool("pool has been shut down".to_string()))?;

        // Shutdown may have begun while this call was queued for a slot.
        // The permit drops with either error, freeing the slot again.
        if self.is_shut_down() {
            return Err(ScrapeError::BrowserClosed);
        }
        let mut session = self.browser.new_session().await?;
        session.set_request_filter(self.filter.clone());

        let opened = self.opened.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Session opened ({} in use)",
            opened.saturating_sub(self.sessions_released())
        );

        Ok(PooledSession {
            session: Some(session),
            permit: Some(permit),
            pool: Arc::clone(self),
        })
    }

    /// Waits for every session to come back, then closes the browser
    ///
    /// Only the first call closes the browser; later calls return at once.
    pub async fn shutdown(&self) -> Result<()> {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let in_use = self.sessions_in_use();
        if in_use > 0 {
            debug!("Waiting for {} session(s) before closing the browser", in_use);
        }

        match self.permits.acquire_many(self.capacity).await {
            Ok(all) => {
                self.permits.close();
                drop(all);
            }
            Err(_) => warn!("Session semaphore closed before shutdown"),
        }

        self.browser.close().await?;
        debug!(
            "Browser closed after {} session(s), {} request(s) aborted",
            self.sessions_opened(),
            self.requests_aborted()
        );
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn sessions_in_use(&self) -> usize {
        self.sessions_opened().saturating_sub(self.sessions_released())
    }

    /// Requests aborted by the filter across every released session
    pub fn requests_aborted(&self) -> u64 {
        self.requests_aborted.load(Ordering::SeqCst)
    }

    fn record_release(&self, session: &B::Session) {
        self.requests_aborted
            .fetch_add(session.request_stats().aborted, Ordering::SeqCst);
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A session checked out of a `SessionPool`
///
/// Call `release` once done with it. Dropping it unreleased closes the
/// session on a background task, and its slot frees up after that close
/// completes.
pub struct PooledSession<B: Browser> {
    session: Option<B::Session>,
    permit: Option<OwnedSemaphorePermit>,
    pool: Arc<SessionPool<B>>,
}

impl<B: Browser> PooledSession<B> {
    /// Closes the session and frees its slot
    pub async fn release(mut self) -> Result<()> {
        let permit = self.permit.take();
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };

        let closed = session.close().await;
        self.pool.record_release(&session);
        drop(permit);
        closed
    }
}

impl<B: Browser> Deref for PooledSession<B> {
    type Target = B::Session;

    fn deref(&self) -> &Self::Target {
        match &self.session {
            Some(session) => session,
            None => unreachable!("session is only taken on release"),
        }
    }
}

impl<B: Browser> DerefMut for PooledSession<B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.session {
            Some(session) => session,
            None => unreachable!("session is only taken on release"),
        }
    }
}

impl<B: Browser> Drop for PooledSession<B> {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        let permit = self.permit.take();
        let pool = Arc::clone(&self.pool);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!("Failed to close dropped session: {}", e);
                    }
                    pool.record_release(&session);
                    drop(permit);
                });
            }
            Err(_) => {
                warn!("Session dropped outside a runtime; skipping close");
                pool.record_release(&session);
            }
        }
    }
}
