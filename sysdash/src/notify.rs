//! Notification queue shown as toasts over the content area.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    note: Notification,
    at: Instant,
}

/// Bounded FIFO; oldest entries fall off when full or when their TTL passes.
#[derive(Debug)]
pub struct Notifications {
    entries: VecDeque<Entry>,
    cap: usize,
    ttl: Duration,
}

impl Notifications {
    pub fn new(cap: usize, ttl: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap: cap.max(1),
            ttl,
        }
    }

    pub fn push(&mut self, note: Notification, now: Instant) {
        if self.entries.len() == self.cap {
            self.entries.pop_front();
        }
        tracing::debug!(severity = ?note.severity, message = %note.message, "notification");
        self.entries.push_back(Entry { note, at: now });
    }

    /// Drop entries older than the TTL. Errors stay twice as long.
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries.retain(|e| {
            let keep_for = if e.note.severity == Severity::Error {
                ttl * 2
            } else {
                ttl
            };
            now.saturating_duration_since(e.at) < keep_for
        });
    }

    /// Dismiss the oldest entry.
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.entries.pop_front().map(|e| e.note)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.entries.iter().map(|e| &e.note)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(8))
    }
}
