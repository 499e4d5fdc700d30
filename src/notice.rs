//! Transient user notices and the host clipboard port.
//!
//! Notices are local feedback for operations like copy and export. They
//! expire on a short clock and are never replicated.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use std::time::Duration;

use tokio::time::Instant;

use crate::consts::NOTICE_TTL_MS;

// =============================================================================
// TYPES
// =============================================================================

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One transient message for the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
}

struct TimedNotice {
    notice: Notice,
    posted_at: Instant,
}

// =============================================================================
// NOTICE CENTER
// =============================================================================

/// Holds notices until they age out.
pub struct NoticeCenter {
    entries: Vec<TimedNotice>,
    ttl: Duration,
}

impl NoticeCenter {
    /// Center with the stock display window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_millis(NOTICE_TTL_MS))
    }

    /// Center with an explicit display window.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: Vec::new(), ttl }
    }

    /// Post a notice observed at `now`.
    pub fn post(&mut self, text: impl Into<String>, level: NoticeLevel, now: Instant) {
        self.entries.push(TimedNotice {
            notice: Notice { text: text.into(), level },
            posted_at: now,
        });
    }

    /// Drop notices whose display window has fully elapsed at `now`.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries.retain(|entry| entry.posted_at + ttl > now);
    }

    /// Live notices, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter().map(|entry| &entry.notice)
    }

    /// Number of live notices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no notices are showing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NoticeCenter {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CLIPBOARD PORT
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

impl crate::transport::ErrorCode for ClipboardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::WriteFailed(_) => "E_CLIPBOARD_WRITE",
        }
    }
}

/// Host clipboard. The session treats a missing implementation as a
/// quiet no-op and a failed write as a user-visible error.
pub trait Clipboard: Send {
    /// Place `text` on the host clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError::WriteFailed`] when the host refuses the
    /// write.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================
