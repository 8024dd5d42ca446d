//! Notification record shown by the toast

use serde::{Deserialize, Serialize};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        };
        write!(f, "{}", label)
    }
}

/// Content of a transient notification.
///
/// Visibility is not stored here: it is derived from the toast phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub headline: String,
    pub detail: Option<String>,
    /// 0 disables auto-dismiss
    pub auto_dismiss_ms: u64,
}

impl Notification {
    pub fn new(kind: NotificationKind, headline: impl Into<String>, auto_dismiss_ms: u64) -> Self {
        Self {
            kind,
            headline: headline.into(),
            detail: None,
            auto_dismiss_ms,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
