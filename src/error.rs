//! Error types for the collaborators around the typing engine.
//!
//! None of these are fatal: a failed fetch leaves the previous page in
//! place and a failed submission leaves the computed stats visible.

use thiserror::Error;

/// Errors that can occur while fetching a word pool.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The word provider could not be reached.
    #[error("word provider not reachable at {0}")]
    Unreachable(String),

    /// The request timed out.
    #[error("word request timed out after {0}s")]
    Timeout(u64),

    /// The provider answered with an error status.
    #[error("word provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not a word list.
    #[error("malformed word list: {0}")]
    Malformed(String),

    /// No word list exists for the requested language.
    #[error("no word list available for {0}")]
    Unavailable(String),
}

/// Errors that can occur while emitting a session result.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The result sink could not be reached.
    #[error("result sink not reachable at {0}")]
    Unreachable(String),

    /// The request timed out.
    #[error("result submission timed out after {0}s")]
    Timeout(u64),

    /// The sink answered with an error status.
    #[error("result sink returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The sink rejected the result for another reason.
    #[error("result rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Raised when a language code or name is not one of the supported ones.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language: {0}")]
pub struct ParseLanguageError(pub String);
