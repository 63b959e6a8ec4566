//! Error types for desk-client.

use thiserror::Error;

/// Client error types.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Building or sending the request failed (connect, timeout, TLS).
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The daemon answered with a non-success status. `detail` is the
    /// response body rendered as text, ready to show to the user.
    #[error("Daemon rejected request (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },
}

impl ClientError {
    /// User-facing text for this error.
    ///
    /// For rejections this is the daemon's own detail; for transport
    /// failures it is the whole message.
    pub fn detail(&self) -> String {
        match self {
            Self::HttpClient(msg) => msg.clone(),
            Self::Rejected { detail, .. } => detail.clone(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;
