//! Error types for the application.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] desk_feed::FeedError),

    #[error("Client error: {0}")]
    Client(#[from] desk_client::ClientError),
}

/// Result type alias for application operations.
pub type AppResult<T> = std::result::Result<T, AppError>;
