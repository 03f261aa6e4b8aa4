//! Bounded in-memory activity log
//!
//! An injected observability collaborator passed explicitly to the
//! services. Retains the last `capacity` entries in a ring buffer;
//! older entries are dropped. Surfaced read-only through the
//! monitoring endpoint.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default retained-entry capacity.
pub const DEFAULT_CAPACITY: usize = 1000;

/// One retained log entry.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    /// Coarse category ("session", "payment", "station", ...).
    pub category: &'static str,
    pub message: String,
}

/// Ring buffer of recent activity, shared across services.
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEntry>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one when full.
    pub fn record(&self, category: &'static str, message: impl Into<String>) {
        let entry = ActivityEntry {
            timestamp: Utc::now(),
            category,
            message: message.into(),
        };
        let mut entries = self.entries.lock().expect("activity log poisoned");
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The most recent `limit` entries, newest last.
    pub fn recent(&self, limit: usize) -> Vec<ActivityEntry> {
        let entries = self.entries.lock().expect("activity log poisoned");
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("activity log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_reads_back() {
        let log = ActivityLog::new();
        log.record("session", "session 1 started");
        log.record("payment", "payment 1 settled");

        let recent = log.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].category, "session");
        assert_eq!(recent[1].message, "payment 1 settled");
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let log = ActivityLog::with_capacity(3);
        for i in 0..5 {
            log.record("station", format!("entry {}", i));
        }
        assert_eq!(log.len(), 3);
        let recent = log.recent(10);
        assert_eq!(recent[0].message, "entry 2");
        assert_eq!(recent[2].message, "entry 4");
    }

    #[test]
    fn recent_limit_returns_newest() {
        let log = ActivityLog::new();
        for i in 0..10 {
            log.record("station", format!("entry {}", i));
        }
        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "entry 8");
        assert_eq!(recent[1].message, "entry 9");
    }
}
