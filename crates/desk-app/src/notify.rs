//! Transient, dismissible notifications.
//!
//! Submission failures surface here and nowhere else. A notification
//! auto-expires after its TTL or can be dismissed early; nothing in the
//! rest of the session depends on one existing.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// One user-visible notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    /// Whether this notification is still visible at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Queue of transient notifications.
pub struct NotificationQueue {
    entries: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
    ttl: Duration,
}

impl NotificationQueue {
    /// Create a queue whose notifications expire after `ttl_ms`.
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            ttl: Duration::milliseconds(ttl_ms as i64),
        }
    }

    /// Push a new notification, returning its id.
    pub fn push(&self, text: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        self.entries.lock().push(Notification {
            id,
            text: text.into(),
            created_at: now,
            expires_at: now + self.ttl,
        });
        id
    }

    /// Currently visible notifications. Expired entries are dropped as a
    /// side effect, so the queue never grows unbounded.
    pub fn active(&self) -> Vec<Notification> {
        let now = Utc::now();
        let mut entries = self.entries.lock();
        entries.retain(|n| n.is_active(now));
        entries.clone()
    }

    /// Dismiss one notification early. Unknown ids are a no-op.
    pub fn dismiss(&self, id: u64) {
        self.entries.lock().retain(|n| n.id != id);
    }
}
