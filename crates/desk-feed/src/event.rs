//! Typed events and the channel-name parser.
//!
//! Maps a decoded SSE frame (channel name + raw JSON) to a `FeedEvent`.
//! Unknown channel names are ignored rather than treated as errors, so a
//! daemon that grows new channels does not break older desks.

use crate::error::{FeedError, FeedResult};
use desk_core::{Cfd, Order, PriceInfo, WalletInfo};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Named event channels recognized by the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Cfds,
    Order,
    Wallet,
    Quote,
}

impl Channel {
    /// Wire name of this channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cfds => "cfds",
            Self::Order => "order",
            Self::Wallet => "wallet",
            Self::Quote => "quote",
        }
    }

    fn from_wire(name: &str) -> Option<Self> {
        match name {
            "cfds" => Some(Self::Cfds),
            "order" => Some(Self::Order),
            "wallet" => Some(Self::Wallet),
            "quote" => Some(Self::Quote),
            _ => None,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One typed event from the daemon feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Full snapshot of all positions. Always wholesale, never a delta.
    Cfds(Vec<Cfd>),
    /// The outstanding sell order, or `None` if none exists.
    Order(Option<Order>),
    /// Wallet snapshot.
    Wallet(WalletInfo),
    /// Market quote snapshot.
    Quote(PriceInfo),
}

impl FeedEvent {
    /// Channel this event arrived on.
    pub fn channel(&self) -> Channel {
        match self {
            Self::Cfds(_) => Channel::Cfds,
            Self::Order(_) => Channel::Order,
            Self::Wallet(_) => Channel::Wallet,
            Self::Quote(_) => Channel::Quote,
        }
    }
}

/// Counters for parsed vs ignored frames.
#[derive(Debug, Default)]
pub struct ParserStats {
    parsed_count: AtomicU64,
    ignored_count: AtomicU64,
}

impl ParserStats {
    pub fn parsed(&self) -> u64 {
        self.parsed_count.load(Ordering::Relaxed)
    }

    pub fn ignored(&self) -> u64 {
        self.ignored_count.load(Ordering::Relaxed)
    }
}

/// Parses decoded frames into typed events.
#[derive(Debug, Default)]
pub struct EventParser {
    stats: ParserStats,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &ParserStats {
        &self.stats
    }

    /// Parse a frame into a typed event.
    ///
    /// Returns `Ok(None)` for channels the desk does not recognize.
    /// A malformed payload on a recognized channel is an error: the
    /// daemon and desk disagree on the schema, which is worth surfacing.
    pub fn parse(&self, event: &str, data: &str) -> FeedResult<Option<FeedEvent>> {
        let channel = match Channel::from_wire(event) {
            Some(channel) => channel,
            None => {
                self.stats.ignored_count.fetch_add(1, Ordering::Relaxed);
                debug!(event = %event, "Unknown feed channel, ignoring");
                return Ok(None);
            }
        };

        let parsed = match channel {
            Channel::Cfds => {
                // A null snapshot is treated as empty.
                let cfds: Option<Vec<Cfd>> = serde_json::from_str(data)
                    .map_err(|e| FeedError::Parse(format!("Invalid cfds payload: {e}")))?;
                FeedEvent::Cfds(cfds.unwrap_or_default())
            }
            Channel::Order => {
                let order: Option<Order> = serde_json::from_str(data)
                    .map_err(|e| FeedError::Parse(format!("Invalid order payload: {e}")))?;
                FeedEvent::Order(order)
            }
            Channel::Wallet => {
                let wallet: WalletInfo = serde_json::from_str(data)
                    .map_err(|e| FeedError::Parse(format!("Invalid wallet payload: {e}")))?;
                FeedEvent::Wallet(wallet)
            }
            Channel::Quote => {
                let quote: PriceInfo = serde_json::from_str(data)
                    .map_err(|e| FeedError::Parse(format!("Invalid quote payload: {e}")))?;
                FeedEvent::Quote(quote)
            }
        };

        self.stats.parsed_count.fetch_add(1, Ordering::Relaxed);
        Ok(Some(parsed))
    }
}
