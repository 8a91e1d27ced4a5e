//! # pagefeed
//!
//! Trigger-driven, lazily unfolding page streams for async Rust.
//!
//! A page stream turns (a) a function producing the next page given the
//! previous one and (b) a predicate deciding whether more pages exist into a
//! single ordered stream of pages that advances exactly once per external
//! "load more" signal, completes when pages are exhausted, and ignores
//! redundant advance signals that arrive before a page has been produced.
//!
//! ## Features
//!
//! - **Eager first page**: page 1 is fetched as soon as the stream is built,
//!   no signal required.
//! - **One signal, one page**: each advance event yields exactly one fetch;
//!   signals arriving while a fetch is in flight are no-ops.
//! - **Replay-1 sharing**: any number of subscribers observe one fetch
//!   sequence; late subscribers receive the latest page, never the backlog.
//! - **Strictly sequential**: never more than one fetch in flight, pages
//!   emitted in request order.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use pagefeed::{Pager, Result};
//!
//! #[derive(Clone)]
//! struct Page { values: Vec<u32>, has_more: bool }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pager = Pager::new(
//!         |previous: Option<Page>| async move {
//!             let last = previous.and_then(|p| p.values.last().copied()).unwrap_or(0);
//!             Ok(Page { values: vec![last + 1, last + 2], has_more: last < 8 })
//!         },
//!         |page: &Page| page.has_more,
//!     );
//!
//!     let mut pages = pager.pages();
//!     while let Some(page) = pages.next().await {
//!         let page = page?;
//!         // render the page, then ask for the next one
//!         pager.advance();
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! advance signals ───▶ ┌───────────────────────────────┐
//!                      │  driver task (one per stream) │
//!  PageSource    ◀──── │  Fetching → AwaitingAdvance → │
//!  next_page/has_next  │     Completed | Failed        │
//!                      └───────────────┬───────────────┘
//!                                      │ emit (replay-1)
//!                       subscribers: PageStream ... PageStream
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Page source trait and closure adapter
pub mod source;

/// The page stream engine
pub mod stream;

/// Pager handle with the single-outstanding-request guard
pub mod pager;

/// Array-chunking convenience source
pub mod chunk;

// ============================================================================
// Re-exports
// ============================================================================

pub use chunk::{page_over, ChunkSource};
pub use error::{Error, Result};
pub use pager::Pager;
pub use source::{FnSource, PageSource};
pub use stream::{page_stream, PageStream, Pages, StreamState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
