//! Short-lived notifications surfaced after sync mutations.
//!
//! A side effect of the data flow, not part of the data contract: the
//! notifier holds at most one notice and reads drop it once expired.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default lifetime of a notice before it auto-clears.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// A transient, auto-expiring message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    expires_at: Instant,
}

impl Notice {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Holds the most recent notice.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Mutex<Option<Notice>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        self.push_with_ttl(message, DEFAULT_NOTICE_TTL);
    }

    pub fn push_with_ttl(&self, message: impl Into<String>, ttl: Duration) {
        let notice = Notice {
            message: message.into(),
            expires_at: Instant::now() + ttl,
        };
        let mut slot = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(notice);
    }

    /// The current notice, dropping it first if it has expired.
    pub fn current(&self) -> Option<Notice> {
        let mut slot = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|n| n.is_expired()) {
            *slot = None;
        }
        slot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_visible_until_expiry() {
        let notifier = Notifier::new();
        assert!(notifier.current().is_none());

        notifier.push_with_ttl("3 new quotes", Duration::from_secs(60));
        assert_eq!(notifier.current().unwrap().message, "3 new quotes");

        notifier.push_with_ttl("gone already", Duration::ZERO);
        assert!(notifier.current().is_none());
    }

    #[test]
    fn newer_notice_replaces_older() {
        let notifier = Notifier::new();
        notifier.push("first");
        notifier.push("second");
        assert_eq!(notifier.current().unwrap().message, "second");
    }
}
