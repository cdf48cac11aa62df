//! Codec Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A codec error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file does not follow the implementors script layout.
    #[display("malformed implementors file at byte {offset}: expected {expected}")]
    Malformed {
        /// Byte offset into the source where parsing stopped.
        offset: usize,
        /// What the parser was looking for.
        expected: &'static str,
    },
    /// An embedded JSON literal could not be decoded (or encoded).
    #[display("invalid JSON {what} at byte {offset}")]
    Json {
        /// Byte offset of the literal.
        offset: usize,
        /// Which literal failed (crate key, record list).
        what: &'static str,
    },
    /// The same crate was assigned twice in one file.
    #[display("crate assigned more than once: {_0}")]
    DuplicateCrate(#[error(not(source))] String),
    /// Both files list implementors for the same crate under a strict merge.
    #[display("conflicting implementors for crate: {_0}")]
    Conflict(#[error(not(source))] String),
    /// A handoff name is not usable as a JavaScript identifier.
    #[display("invalid JavaScript identifier: {_0:?}")]
    InvalidIdentifier(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Decoding is deterministic, the same bytes fail the same way.
        false
    }
}
