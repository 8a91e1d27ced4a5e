//! Page sources
//!
//! [`PageSource`] is the seam between the stream engine and caller-supplied
//! paging logic: one async fetch step plus a continuation predicate. The
//! engine drives a source strictly sequentially (never more than one fetch in
//! flight) and evaluates `has_next` exactly once per fetched page, so
//! implementations may keep plain mutable state across calls without any
//! synchronization of their own.

use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// A source of pages consumed by the stream engine.
///
/// The engine never inspects page contents; it only passes pages back into
/// `next_page` and `has_next`.
#[async_trait]
pub trait PageSource: Send {
    /// One unit of caller-defined data produced per fetch.
    type Page: Clone + Send + 'static;

    /// Produce the page following `previous` (`None` for the first page).
    ///
    /// A returned error terminates the output stream; the engine does not
    /// retry.
    async fn next_page(&mut self, previous: Option<Self::Page>) -> Result<Self::Page>;

    /// Whether more pages follow the just-fetched `page`.
    fn has_next(&mut self, page: &Self::Page) -> bool;
}

/// Adapter turning a paging closure and a continuation predicate into a
/// [`PageSource`].
///
/// This is the two-function builder form: `next_page` receives the previous
/// page (`None` for the first call) and must produce exactly one page;
/// `has_next` receives the just-fetched page.
pub struct FnSource<T, F, P> {
    next_page: F,
    has_next: P,
    _page: PhantomData<fn() -> T>,
}

impl<T, F, P> FnSource<T, F, P> {
    /// Wrap a paging function and a continuation predicate.
    pub fn new(next_page: F, has_next: P) -> Self {
        Self {
            next_page,
            has_next,
            _page: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F, Fut, P> PageSource for FnSource<T, F, P>
where
    T: Clone + Send + 'static,
    F: FnMut(Option<T>) -> Fut + Send,
    Fut: Future<Output = Result<T>> + Send + 'static,
    P: FnMut(&T) -> bool + Send,
{
    type Page = T;

    async fn next_page(&mut self, previous: Option<T>) -> Result<T> {
        (self.next_page)(previous).await
    }

    fn has_next(&mut self, page: &T) -> bool {
        (self.has_next)(page)
    }
}
