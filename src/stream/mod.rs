//! Page stream engine
//!
//! Turns a page source and an advance-signal stream into a shared, ordered,
//! lazily unfolding stream of pages.
//!
//! # Overview
//!
//! Three public pieces:
//! - [`page_stream`] — the builder: paging closure + continuation predicate +
//!   advance stream in, [`Pages`] handle out.
//! - [`Pages`] — shared handle to one running stream; subscribing never
//!   re-runs a fetch, and late subscribers replay only the latest page.
//! - [`PageStream`] — one subscription, a `Stream<Item = Result<Page>>`.
//!
//! The first page is fetched eagerly at build time; each advance event then
//! yields exactly one further fetch. Signals arriving while a fetch is in
//! flight are dropped. The unfold runs as an explicit state machine
//! ([`StreamState`]) on a dedicated task, never more than one fetch in
//! flight.

mod driver;
mod shared;
mod types;

pub use types::StreamState;

use crate::error::Result;
use crate::source::{FnSource, PageSource};
use futures::Stream;
use shared::Shared;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use types::PageEvent;


// ============================================================================
// Pages handle
// ============================================================================

/// Shared handle to a running page stream.
///
/// Cloning the handle does not re-run any fetch; all clones and all
/// subscriptions observe the single underlying fetch sequence.
pub struct Pages<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Send + 'static> Pages<T> {
    /// Build a page stream over a [`PageSource`] and an advance stream.
    ///
    /// The first fetch starts immediately, with no advance event required;
    /// every later fetch waits for one advance event. Must be called from
    /// within a tokio runtime: the unfold runs on a spawned task that stops
    /// when the last handle and subscription are dropped.
    pub fn from_source<S, A>(source: S, advance: A) -> Self
    where
        S: PageSource<Page = T> + 'static,
        A: Stream<Item = ()> + Send + 'static,
    {
        let (shared, closed) = Shared::new();
        let shared = Arc::new(shared);
        tokio::spawn(driver::drive(
            source,
            advance,
            Arc::downgrade(&shared),
            closed,
        ));
        Self { shared }
    }

    /// Subscribe to the page sequence.
    ///
    /// A subscriber joining after some pages were already emitted immediately
    /// receives the most recent page (replay depth exactly 1), never the full
    /// backlog, then subsequent pages as normal.
    pub fn subscribe(&self) -> PageStream<T> {
        let (id, rx) = self.shared.subscribe();
        PageStream {
            rx,
            shared: Arc::clone(&self.shared),
            id,
        }
    }

    /// Current lifecycle state of the stream.
    pub fn state(&self) -> StreamState {
        self.shared.state()
    }
}

impl<T> Clone for Pages<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Build a page stream from a paging closure, a continuation predicate and
/// an externally supplied advance stream.
///
/// `next_page` receives the previous page (`None` for the first call) and
/// must produce exactly one page; `has_next` is evaluated once per fetched
/// page, with the just-fetched page. A fetch error terminates the stream.
pub fn page_stream<T, F, Fut, P, A>(next_page: F, has_next: P, advance: A) -> Pages<T>
where
    T: Clone + Send + 'static,
    F: FnMut(Option<T>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    P: FnMut(&T) -> bool + Send + 'static,
    A: Stream<Item = ()> + Send + 'static,
{
    Pages::from_source(FnSource::new(next_page, has_next), advance)
}

// ============================================================================
// Subscription
// ============================================================================

/// One subscription to a shared page stream.
///
/// Yields `Ok(page)` per fetched page in fetch order, at most one `Err` on
/// fetch failure, then ends. Dropping a subscription detaches it without
/// affecting other subscribers; dropping the last subscription together with
/// the last [`Pages`] handle tears the whole stream down, in-flight fetch
/// included.
pub struct PageStream<T> {
    rx: mpsc::UnboundedReceiver<PageEvent<T>>,
    shared: Arc<Shared<T>>,
    id: u64,
}

impl<T> Stream for PageStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(PageEvent::Page(page))) => Poll::Ready(Some(Ok(page))),
            Poll::Ready(Some(PageEvent::Error(error))) => Poll::Ready(Some(Err(error))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for PageStream<T> {
    fn drop(&mut self) {
        self.shared.unsubscribe(self.id);
    }
}
