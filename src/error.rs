//! Error type shared by the record store and the menu. Every variant is a
//! condition the menu reports to the user before carrying on; none of them
//! ends the session on its own.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// `add` was given an id other than the next free one. Ids are handed out
    /// in sequence so the id set stays `0..len`.
    #[error("Invalid id {got}: the next book must use id {expected}")]
    InvalidId { expected: i64, got: i64 },

    /// `remove` found no record carrying this id.
    #[error("Book with ID {0} not found")]
    NotFound(i64),

    /// A position outside `0..len` was requested. Negative positions land
    /// here too rather than wrapping.
    #[error("Invalid position {index}: the catalog holds {len} book(s)")]
    InvalidIndex { index: i64, len: usize },

    /// Text that could not be turned into the expected value: a non-numeric
    /// entry at a number prompt, or a persisted line that is not a record.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Reading or writing the catalog file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded to or decoded from JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the store.
pub type Result<T> = std::result::Result<T, CatalogError>;
