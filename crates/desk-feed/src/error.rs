//! Error types for desk-feed.

use thiserror::Error;

/// Feed error types.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid UTF-8 in stream: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type alias for feed operations.
pub type FeedResult<T> = std::result::Result<T, FeedError>;
