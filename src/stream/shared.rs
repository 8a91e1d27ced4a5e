//! Shared replay-1 state for a page stream
//!
//! One `Shared` per stream, owned jointly by the [`Pages`](super::Pages)
//! handle and by every live [`PageStream`](super::PageStream) subscription.
//! The driver task holds only a weak reference plus the receiver half of the
//! `watch` channel whose sender lives here: dropping the last strong owner
//! closes the channel and wakes the driver, which then tears itself down.
//!
//! Subscribers get their own unbounded queue so a slow subscriber never
//! reorders or loses pages; `last` holds the single replayed page for late
//! subscribers.

use crate::error::Error;
use crate::stream::types::{PageEvent, StreamState};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch};

pub(crate) struct Shared<T> {
    inner: Mutex<Inner<T>>,
    // Dropped with the last strong owner; the driver observes the closed
    // receiver half and stops mid-fetch or mid-suspension.
    _alive: watch::Sender<()>,
}

struct Inner<T> {
    state: StreamState,
    last: Option<T>,
    error: Option<Error>,
    subscribers: Vec<Subscriber<T>>,
    next_id: u64,
}

struct Subscriber<T> {
    id: u64,
    tx: mpsc::UnboundedSender<PageEvent<T>>,
}

impl<T> Shared<T> {
    pub(crate) fn new() -> (Self, watch::Receiver<()>) {
        let (alive_tx, alive_rx) = watch::channel(());
        let shared = Self {
            inner: Mutex::new(Inner {
                state: StreamState::Fetching,
                last: None,
                error: None,
                subscribers: Vec::new(),
                next_id: 0,
            }),
            _alive: alive_tx,
        };
        (shared, alive_rx)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> StreamState {
        self.lock().state
    }

    pub(crate) fn set_state(&self, state: StreamState) {
        let mut inner = self.lock();
        if inner.state != state {
            tracing::debug!(from = ?inner.state, to = ?state, "page stream state");
            inner.state = state;
        }
    }

    pub(crate) fn unsubscribe(&self, id: u64) {
        self.lock().subscribers.retain(|s| s.id != id);
    }
}

impl<T: Clone> Shared<T> {
    /// Register a new subscriber queue.
    ///
    /// The most recent page (if any) is replayed immediately; on an already
    /// terminated stream the terminal event follows and the queue closes
    /// without being registered.
    pub(crate) fn subscribe(&self) -> (u64, mpsc::UnboundedReceiver<PageEvent<T>>) {
        let mut inner = self.lock();
        let (tx, rx) = mpsc::unbounded_channel();
        let id = inner.next_id;
        inner.next_id += 1;

        if let Some(last) = &inner.last {
            let _ = tx.send(PageEvent::Page(last.clone()));
        }
        match inner.state {
            StreamState::Completed => {}
            StreamState::Failed => {
                if let Some(error) = &inner.error {
                    let _ = tx.send(PageEvent::Error(error.clone()));
                }
            }
            StreamState::Fetching | StreamState::AwaitingAdvance => {
                inner.subscribers.push(Subscriber { id, tx });
            }
        }
        (id, rx)
    }

    /// Emit a page to every live subscriber and remember it for replay.
    pub(crate) fn emit(&self, page: T) {
        let mut inner = self.lock();
        inner.last = Some(page.clone());
        inner
            .subscribers
            .retain(|s| s.tx.send(PageEvent::Page(page.clone())).is_ok());
    }

    /// Emit the final page and complete the stream.
    pub(crate) fn complete_with(&self, page: T) {
        let mut inner = self.lock();
        inner.last = Some(page.clone());
        inner.state = StreamState::Completed;
        for sub in inner.subscribers.drain(..) {
            let _ = sub.tx.send(PageEvent::Page(page.clone()));
        }
        tracing::debug!("page stream completed");
    }

    /// Complete without a new page (the advance source was exhausted).
    pub(crate) fn complete(&self) {
        let mut inner = self.lock();
        inner.state = StreamState::Completed;
        inner.subscribers.clear();
        tracing::debug!("page stream completed");
    }

    /// Terminate the stream with a fetch failure.
    pub(crate) fn fail(&self, error: Error) {
        let mut inner = self.lock();
        inner.state = StreamState::Failed;
        inner.error = Some(error.clone());
        for sub in inner.subscribers.drain(..) {
            let _ = sub.tx.send(PageEvent::Error(error.clone()));
        }
        tracing::debug!(%error, "page stream failed");
    }
}
