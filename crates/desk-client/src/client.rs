//! HTTP client for the maker daemon.
//!
//! Submission requests carry a timeout; the feed connection does not,
//! since it is expected to stay open indefinitely.

use crate::error::{ClientError, ClientResult};
use bytes::Bytes;
use desk_core::SellOrderRequest;
use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Timeout for one-shot requests (not applied to the feed).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw feed transport: SSE bytes as they arrive from the daemon.
pub type FeedStream = BoxStream<'static, ClientResult<Bytes>>;

/// Basic-auth credentials for the daemon.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Client for the maker daemon's HTTP API.
pub struct DaemonClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl DaemonClient {
    /// Create a new daemon client.
    ///
    /// # Arguments
    /// * `base_url` - Daemon address, e.g. "http://localhost:8001"
    /// * `credentials` - Basic-auth credentials the daemon requires
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> ClientResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Submit a sell order.
    ///
    /// Success carries no data beyond completion. A non-success status
    /// becomes `ClientError::Rejected` with the body rendered as text.
    pub async fn submit_sell_order(&self, order: &SellOrderRequest) -> ClientResult<()> {
        let url = self.url("/api/order/sell");
        info!(url = %url, price = %order.price, "Submitting sell order");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .timeout(DEFAULT_TIMEOUT)
            .json(order)
            .send()
            .await
            .map_err(|e| ClientError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                detail: render_detail(&body, status.as_u16()),
            });
        }

        debug!("Sell order accepted");
        Ok(())
    }

    /// Open the daemon's event feed.
    ///
    /// Returns the raw byte stream; decoding is the caller's concern.
    /// Reconnect policy also lives with the caller; this method opens
    /// exactly one connection.
    pub async fn feed_stream(&self) -> ClientResult<FeedStream> {
        let url = self.url("/api/feed");
        info!(url = %url, "Opening event feed");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| ClientError::HttpClient(format!("Feed connect failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                detail: render_detail(&body, status.as_u16()),
            });
        }

        Ok(Box::pin(response.bytes_stream().map_err(|e| {
            ClientError::HttpClient(format!("Feed stream error: {e}"))
        })))
    }
}

/// Render an error body as user-facing text.
///
/// JSON strings unwrap to their contents, other JSON values render
/// compactly, plain text passes through, and an empty body falls back to
/// the HTTP status.
fn render_detail(body: &str, status: u16) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {status}");
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(value) => value.to_string(),
        Err(_) => trimmed.to_string(),
    }
}
