//! Transient user notices
//!
//! Banners that clear themselves after a fixed time to live.

use shared::util::now_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    /// UTC millis after which the notice is gone
    pub expires_at: i64,
}

/// Queue of auto-dismissing notices
#[derive(Debug, Clone)]
pub struct Notifier {
    ttl_ms: u64,
    next_id: u64,
    notices: Vec<Notice>,
}

impl Notifier {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl_ms,
            next_id: 1,
            notices: Vec::new(),
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.push_at(level, message, now_millis())
    }

    pub fn push_at(&mut self, level: NoticeLevel, message: impl Into<String>, now: i64) -> u64 {
        self.notices.retain(|n| n.expires_at > now);
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            level,
            message: message.into(),
            expires_at: now.saturating_add(self.ttl_ms as i64),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message)
    }

    /// Notices still showing now
    pub fn active(&mut self) -> &[Notice] {
        self.active_at(now_millis())
    }

    /// Drop expired notices and return the rest, oldest first
    pub fn active_at(&mut self, now: i64) -> &[Notice] {
        self.notices.retain(|n| n.expires_at > now);
        &self.notices
    }

    /// Latest notice, possibly expired since the last push
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(3000)
    }
}
