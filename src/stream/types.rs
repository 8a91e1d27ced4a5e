//! Core types for the page stream engine

use crate::error::Error;

/// Lifecycle of a page stream.
///
/// The driver task walks these states front to back: `Fetching` while a page
/// is being produced, `AwaitingAdvance` while suspended between pages, then
/// one of the two terminal states. Once terminal, no further fetch ever runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// A page fetch is in flight (including the eager first fetch).
    Fetching,
    /// The last page had a successor; waiting for an advance signal.
    AwaitingAdvance,
    /// The final page was emitted; the stream completed normally.
    Completed,
    /// A fetch failed; the stream terminated with an error.
    Failed,
}

impl StreamState {
    /// Whether the stream can still emit pages.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Fetching | Self::AwaitingAdvance)
    }

    /// Whether the stream reached a terminal state.
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

/// Event delivered to a subscriber queue.
#[derive(Debug, Clone)]
pub(crate) enum PageEvent<T> {
    /// A fetched page.
    Page(T),
    /// Terminal fetch failure.
    Error(Error),
}
