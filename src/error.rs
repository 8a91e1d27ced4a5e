//! Error types for pagefeed
//!
//! A page stream can fail in exactly one semantic way: the caller-supplied
//! fetch fails to produce a page. That failure terminates the stream; it is
//! never retried and the stream never resumes. Redundant advance signals are
//! normal no-ops, not errors, so they have no variant here.
//!
//! The error is `Clone` because a terminal failure is delivered to every
//! subscriber of a shared stream, including subscribers that join later.

use thiserror::Error;

/// The main error type for pagefeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The caller-supplied paging function failed to produce a page.
    #[error("page fetch failed: {message}")]
    Fetch {
        /// Human-readable description of the failure
        message: String,
    },

    /// Catch-all for caller-side wrapping
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Check if this is a fetch failure
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Result type alias for pagefeed
pub type Result<T> = std::result::Result<T, Error>;
