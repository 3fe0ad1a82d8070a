//! Transient user-facing notifications
//!
//! Notifications are purely informational; they never affect scene
//! invariants. Each one expires a fixed delay after creation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a notification stays visible
pub const NOTIFICATION_TTL_SECS: i64 = 5;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

/// Queue of live notifications with TTL-based expiry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationQueue {
    items: Vec<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification stamped with the current time
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.push_at(message, severity, Utc::now())
    }

    /// Append a notification with an explicit timestamp (for tests)
    pub fn push_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        timestamp: DateTime<Utc>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            message: message.into(),
            severity,
            timestamp,
        });
        id
    }

    /// Live notifications, oldest first
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Most recent notification, if any
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Drop notifications older than the TTL relative to `now`
    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        let ttl = Duration::seconds(NOTIFICATION_TTL_SECS);
        self.items.retain(|n| now - n.timestamp < ttl);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut queue = NotificationQueue::new();
        let first = queue.push("one", Severity::Info);
        let second = queue.push("two", Severity::Success);
        assert!(second > first);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_purge_drops_only_expired() {
        let mut queue = NotificationQueue::new();
        let now = Utc::now();
        queue.push_at("old", Severity::Info, now - Duration::seconds(10));
        queue.push_at("fresh", Severity::Info, now - Duration::seconds(1));
        queue.purge_expired(now);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.items()[0].message, "fresh");
    }
}
