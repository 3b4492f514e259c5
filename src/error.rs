//! The error taxonomy shared by every module of the core.
//!
//! The core never panics on a caller-reachable path: a malformed input is
//! reported as [`Error::InvalidInput`], and a broken internal invariant is
//! reported as [`Error::UnreachableInvariant`] rather than taken down with
//! `unwrap()`, so that a test (or a caller) can assert on the failure.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Raised at construction time when a dimension or a line list does not
    /// match the shape the rest of the core expects.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Raised when an internal lookup that is expected to always succeed
    /// fails. This indicates a bug in the core, not a bad input.
    #[error("unreachable invariant violated: {0}")]
    UnreachableInvariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
