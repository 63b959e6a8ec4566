//! Desk session: scoped ownership of the feed subscription and store.
//!
//! The session owns the latest-value store, the feed task that fills it,
//! the submission gate, and the notification queue. Dropping the session
//! cancels the feed task, so the subscription's lifetime is tied to the
//! session's. Nothing outlives a torn-down desk.

use crate::config::AppConfig;
use crate::notify::NotificationQueue;
use crate::submit::{BoxFuture, OrderGateway, SubmitOutcome, Submitter};
use desk_client::{ClientResult, DaemonClient, FeedStream};
use desk_core::SellOrderRequest;
use desk_feed::{classify, CfdBuckets, EventParser, FeedState, SseDecoder};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Boundary to whatever produces the event feed. Lets tests drive a
/// session from canned bytes.
pub trait FeedTransport: Send + Sync + 'static {
    fn feed_stream(&self) -> BoxFuture<'_, ClientResult<FeedStream>>;
}

impl FeedTransport for DaemonClient {
    fn feed_stream(&self) -> BoxFuture<'_, ClientResult<FeedStream>> {
        Box::pin(DaemonClient::feed_stream(self))
    }
}

/// One mounted desk session.
pub struct Session {
    state: Arc<FeedState>,
    notifications: Arc<NotificationQueue>,
    submitter: Submitter,
    shutdown: CancellationToken,
    feed_task: JoinHandle<()>,
}

impl Session {
    /// Mount a session: spawn the feed task and arm the submit gate.
    pub fn new(
        transport: Arc<dyn FeedTransport>,
        gateway: Arc<dyn OrderGateway>,
        config: &AppConfig,
    ) -> Self {
        let state = Arc::new(FeedState::new());
        let notifications = Arc::new(NotificationQueue::new(config.notifications.ttl_ms));
        let submitter = Submitter::new(gateway, notifications.clone());
        let shutdown = CancellationToken::new();

        let feed_task = tokio::spawn(run_feed_loop(
            transport,
            state.clone(),
            shutdown.clone(),
            Duration::from_millis(config.feed.reconnect_base_delay_ms),
            Duration::from_millis(config.feed.reconnect_max_delay_ms),
        ));

        Self {
            state,
            notifications,
            submitter,
            shutdown,
            feed_task,
        }
    }

    /// The session's latest-value store.
    pub fn state(&self) -> &Arc<FeedState> {
        &self.state
    }

    /// The session's notification queue.
    pub fn notifications(&self) -> &Arc<NotificationQueue> {
        &self.notifications
    }

    /// Classify the current position snapshot. Absent snapshot means
    /// four empty buckets.
    pub fn buckets(&self) -> CfdBuckets {
        match self.state.cfds() {
            Some(cfds) => classify(&cfds),
            None => CfdBuckets::default(),
        }
    }

    /// Try to submit a sell order through the single-flight gate.
    pub fn submit(&self, order: SellOrderRequest) -> SubmitOutcome {
        self.submitter.submit(order)
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitter.is_submitting()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self.feed_task.abort();
    }
}

/// Feed task: connect, decode, apply; reconnect with exponential backoff
/// on any stream end or transport error.
async fn run_feed_loop(
    transport: Arc<dyn FeedTransport>,
    state: Arc<FeedState>,
    shutdown: CancellationToken,
    base_delay: Duration,
    max_delay: Duration,
) {
    let mut delay = base_delay;

    loop {
        if shutdown.is_cancelled() {
            return;
        }

        match transport.feed_stream().await {
            Ok(stream) => {
                info!("Feed connected");
                delay = base_delay;
                consume_stream(stream, &state, &shutdown).await;
                if shutdown.is_cancelled() {
                    return;
                }
                warn!("Feed disconnected, reconnecting");
            }
            Err(e) => {
                warn!(error = %e, "Feed connect failed");
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = (delay * 2).min(max_delay);
    }
}

/// Drive one feed connection until it ends or the session shuts down.
async fn consume_stream(mut stream: FeedStream, state: &FeedState, shutdown: &CancellationToken) {
    let mut decoder = SseDecoder::new();
    let parser = EventParser::new();

    loop {
        let chunk = tokio::select! {
            _ = shutdown.cancelled() => return,
            chunk = stream.next() => chunk,
        };

        let bytes = match chunk {
            Some(Ok(bytes)) => bytes,
            Some(Err(e)) => {
                warn!(error = %e, "Feed stream error");
                return;
            }
            None => {
                info!("Feed stream closed by daemon");
                return;
            }
        };

        let frames = match decoder.feed(&bytes) {
            Ok(frames) => frames,
            Err(e) => {
                // Corrupt framing; drop the connection and resync.
                warn!(error = %e, "Feed decode error");
                return;
            }
        };

        for frame in frames {
            match parser.parse(&frame.event, &frame.data) {
                Ok(Some(event)) => {
                    let update = state.apply(event);
                    debug!(channel = %update.channel, seq = update.seq, "Applied feed event");
                }
                Ok(None) => {}
                Err(e) => {
                    // Schema mismatch on one frame; keep the connection.
                    warn!(event = %frame.event, error = %e, "Unparseable feed frame");
                }
            }
        }
    }
}
