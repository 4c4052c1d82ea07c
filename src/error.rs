//! Error type shared by the catalog loader and the matching entry points.
//!
//! Matching performs no I/O, so there is exactly one failure kind: the caller
//! handed us something malformed. Everything else (empty text, empty catalog,
//! zero matches) is a valid outcome with an empty result.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed relationship data, an uncompilable catalog, or inconsistent
    /// [`MatchOptions`](crate::MatchOptions).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
