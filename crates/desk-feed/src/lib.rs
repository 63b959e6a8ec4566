//! Event feed handling for cfd-desk.
//!
//! Decodes the daemon's SSE stream into typed events, keeps the most
//! recent payload per channel, and classifies the position snapshot into
//! lifecycle buckets.

pub mod classifier;
pub mod error;
pub mod event;
pub mod sse;
pub mod store;

pub use classifier::{classify, CfdBuckets};
pub use error::{FeedError, FeedResult};
pub use event::{Channel, EventParser, FeedEvent};
pub use sse::{SseDecoder, SseFrame};
pub use store::{ChannelUpdate, FeedState};
