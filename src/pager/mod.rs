//! Pager handle
//!
//! A thin stateful wrapper over the stream engine for callers who do not
//! want to manage their own advance-signal source.
//!
//! # Overview
//!
//! [`Pager::new`] builds the page stream over an internally owned signal
//! source and exposes [`Pager::advance`] as the sole mutation entry point.
//! `advance()` carries the explicit single-outstanding-request guard: a flag
//! armed when a fetch starts and disarmed exactly when that fetch's page is
//! acknowledged with more pages to come. While armed, further calls are
//! silent no-ops, so at most one fetch is ever in flight or pending
//! acknowledgment. After completion or failure the guard stays armed forever.

use crate::error::Result;
use crate::source::{FnSource, PageSource};
use crate::stream::{PageStream, Pages, StreamState};
use async_trait::async_trait;
use futures::stream;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;


/// Pager over a page source, owning its own advance-signal source.
///
/// Dropping the pager closes the signal source; remaining subscriptions
/// observe completion at the next suspension point, and once the last
/// subscription is gone all internal state is torn down.
pub struct Pager<T> {
    pages: Pages<T>,
    advance_tx: mpsc::UnboundedSender<()>,
    // armed while a fetch is pending acknowledgment or the stream is terminal
    in_flight: Arc<AtomicBool>,
}

impl<T: Clone + Send + 'static> Pager<T> {
    /// Create a pager from a paging closure and a continuation predicate.
    ///
    /// The first page is fetched eagerly; call [`Pager::advance`] once per
    /// further page.
    pub fn new<F, Fut, P>(next_page: F, has_next: P) -> Self
    where
        F: FnMut(Option<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        P: FnMut(&T) -> bool + Send + 'static,
    {
        Self::from_source(FnSource::new(next_page, has_next))
    }

    /// Create a pager over any [`PageSource`].
    pub fn from_source<S>(source: S) -> Self
    where
        S: PageSource<Page = T> + 'static,
    {
        let (advance_tx, mut advance_rx) = mpsc::unbounded_channel();
        // armed up front: the first fetch starts without an advance event
        let in_flight = Arc::new(AtomicBool::new(true));

        let source = GuardedSource {
            inner: source,
            guard: Arc::clone(&in_flight),
        };
        let advance = stream::poll_fn(move |cx| advance_rx.poll_recv(cx));
        let pages = Pages::from_source(source, advance);

        Self {
            pages,
            advance_tx,
            in_flight,
        }
    }

    /// Request the next page.
    ///
    /// Returns whether the signal was honored. A call made while a fetch is
    /// pending acknowledgment, or after the stream terminated, is a silent
    /// no-op and returns `false`.
    pub fn advance(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::trace!("advance ignored: fetch pending or stream terminated");
            return false;
        }
        if self.advance_tx.send(()).is_err() {
            // driver already gone; stay armed so later calls keep no-oping
            tracing::trace!("advance ignored: stream torn down");
            return false;
        }
        true
    }

    /// Subscribe to the page sequence (replay depth 1 for late subscribers).
    pub fn pages(&self) -> PageStream<T> {
        self.pages.subscribe()
    }

    /// Shared handle to the underlying stream.
    pub fn handle(&self) -> Pages<T> {
        self.pages.clone()
    }

    /// Current lifecycle state of the stream.
    pub fn state(&self) -> StreamState {
        self.pages.state()
    }
}

/// Disarms the in-flight guard exactly when a fetched page is acknowledged
/// with `has_next = true`. On the final page (or a failed fetch) the guard is
/// never disarmed, which makes every later `advance()` a no-op.
struct GuardedSource<S> {
    inner: S,
    guard: Arc<AtomicBool>,
}

#[async_trait]
impl<S: PageSource> PageSource for GuardedSource<S> {
    type Page = S::Page;

    async fn next_page(&mut self, previous: Option<Self::Page>) -> Result<Self::Page> {
        self.inner.next_page(previous).await
    }

    fn has_next(&mut self, page: &Self::Page) -> bool {
        let more = self.inner.has_next(page);
        if more {
            self.guard.store(false, Ordering::SeqCst);
        }
        more
    }
}
