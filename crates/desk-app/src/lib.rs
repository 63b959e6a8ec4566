//! cfd-desk application: session wiring for the maker daemon client.
//!
//! Owns the session context: the latest-value store, the feed task
//! feeding it, the single-flight submission gate, and the transient
//! notification queue.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod session;
pub mod submit;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use logging::init_logging;
pub use notify::{Notification, NotificationQueue};
pub use session::{FeedTransport, Session};
pub use submit::{OrderGateway, SubmitOutcome, Submitter};
