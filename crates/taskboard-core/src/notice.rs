use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient, user-visible message. Notices never block interaction and
/// disappear once their time-to-live has passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp >= ttl
    }
}

const MAX_NOTICES: usize = 32;

/// Bounded log of notices. Expired entries are pruned on every push.
#[derive(Debug, Clone)]
pub struct NoticeLog {
    entries: Vec<Notice>,
    ttl: Duration,
}

impl NoticeLog {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            entries: Vec::new(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(5)),
        }
    }

    pub fn push(&mut self, level: NoticeLevel, message: String) {
        let notice = Notice::new(level, message);
        let ttl = self.ttl;
        let now = notice.timestamp;
        self.entries.retain(|n| !n.is_expired(now, ttl));
        if self.entries.len() >= MAX_NOTICES {
            let excess = self.entries.len() + 1 - MAX_NOTICES;
            self.entries.drain(..excess);
        }
        self.entries.push(notice);
    }

    pub fn error(&mut self, message: String) {
        self.push(NoticeLevel::Error, message);
    }

    /// Notices still visible at `now`; expired ones are dropped.
    pub fn active(&mut self, now: DateTime<Utc>) -> &[Notice] {
        let ttl = self.ttl;
        self.entries.retain(|n| !n.is_expired(now, ttl));
        &self.entries
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::new(std::time::Duration::from_secs(5))
    }
}
