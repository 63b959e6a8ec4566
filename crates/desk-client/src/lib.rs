//! HTTP boundary to the CFD maker daemon.
//!
//! Two operations: submitting a sell order (single POST) and opening the
//! server-push event feed (long-lived GET returning an SSE byte stream).

pub mod client;
pub mod error;

pub use client::{Credentials, DaemonClient, FeedStream};
pub use error::{ClientError, ClientResult};
