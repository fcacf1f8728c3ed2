// src/session/banner.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a notice stays visible
pub const DEFAULT_NOTICE_TTL_MS: i64 = 3500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

/// One persistent error slot and one transient notice slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBanner {
    error: Option<String>,
    notice: Option<Notice>,
}

impl StatusBanner {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// A newer notice replaces the current one immediately
    pub fn post_notice(&mut self, text: impl Into<String>, now: DateTime<Utc>) {
        self.notice = Some(Notice {
            text: text.into(),
            posted_at: now,
        });
    }

    /// The notice text if it has not yet expired at `now`
    pub fn notice_at(&self, now: DateTime<Utc>, ttl_ms: i64) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|notice| now - notice.posted_at < Duration::milliseconds(ttl_ms))
            .map(|notice| notice.text.as_str())
    }

    pub fn latest_notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|notice| notice.text.as_str())
    }
}
