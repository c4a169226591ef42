//! Error types for delamina content-stream processing.

use thiserror::Error;

/// Primary error type for content-stream parsing and rewriting.
///
/// Every variant is local to the processing of a single content stream;
/// the rewrite engine catches them at stream granularity and leaves the
/// stream's original bytes untouched.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("invalid token at position {pos}: {msg}")]
    TokenizeError { pos: usize, msg: String },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("malformed dictionary: key at position {pos} is not a name")]
    MalformedDictionary { pos: usize },

    #[error("unresolved color space: {0}")]
    UnresolvedColorSpace(String),

    #[error("inline image terminator not found")]
    InlineImageTerminatorNotFound,

    #[error("unbalanced marked content: {0}")]
    UnbalancedMarkedContent(&'static str),

    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    #[error("object not found: {objid} {genno}")]
    ObjectNotFound { objid: u32, genno: u16 },

    #[error("decode error: {0}")]
    DecodeError(String),
}

/// Convenience Result type alias for StreamError.
pub type Result<T> = std::result::Result<T, StreamError>;
