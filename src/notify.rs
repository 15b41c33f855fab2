//! Transient on-screen notifications.
//!
//! User-initiated actions push one notification each. They disappear after
//! a fixed time-to-live or when dismissed by id. Background polling never
//! pushes here.

use std::time::Duration;

use serde::Serialize;

/// Visual level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub message: String,
    #[serde(skip)]
    pub created_at: Duration,
}

/// Active notifications, oldest first.
#[derive(Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    ttl: Duration,
    next_id: u64,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
            next_id: 0,
        }
    }

    /// Show a notification and return its id.
    pub fn push(&mut self, now: Duration, level: Level, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.items.push(Notification {
            id: self.next_id,
            level,
            message: message.into(),
            created_at: now,
        });
        self.next_id
    }

    /// Close a notification manually.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop notifications older than the time-to-live.
    pub fn expire(&mut self, now: Duration) {
        let ttl = self.ttl;
        self.items
            .retain(|n| now.saturating_sub(n.created_at) < ttl);
    }

    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    #[cfg(test)]
    fn last(&self) -> Option<&Notification> {
        self.items.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let mut n = Notifications::new(Duration::from_secs(5));
        n.push(Duration::ZERO, Level::Info, "hello");
        n.push(Duration::from_secs(3), Level::Error, "later");

        n.expire(Duration::from_millis(4999));
        assert_eq!(n.active().len(), 2);

        n.expire(Duration::from_secs(5));
        assert_eq!(n.active().len(), 1);
        assert_eq!(n.active()[0].message, "later");
    }

    #[test]
    fn dismiss_by_id() {
        let mut n = Notifications::new(Duration::from_secs(5));
        let a = n.push(Duration::ZERO, Level::Success, "a");
        let b = n.push(Duration::ZERO, Level::Warning, "b");
        assert!(n.dismiss(a));
        assert!(!n.dismiss(a));
        assert_eq!(n.last().map(|x| x.id), Some(b));
    }
}
