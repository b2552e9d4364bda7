//! Toast-style notifications and the sinks that receive them.
//!
//! A [`NotificationSink`] is fire-and-forget: emitters never wait on it
//! and never learn whether the message was displayed. Stores and the
//! auction report both successes ("Bid placed") and rejected operations
//! ("error:bid_too_low") through the same channel.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// What happened. Auction events map one-to-one onto the session's
/// transitions; `Account` and `Tournament` cover the store toasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum NoticeKind {
    Started,
    BidPlaced,
    BiddingClosed,
    Sold,
    Skipped,
    Completed,
    Account,
    Tournament,
    /// A rejected operation. `reason` is a short machine-readable code
    /// such as `bid_too_low`.
    Error(String),
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::BidPlaced => write!(f, "bid_placed"),
            Self::BiddingClosed => write!(f, "bidding_closed"),
            Self::Sold => write!(f, "sold"),
            Self::Skipped => write!(f, "skipped"),
            Self::Completed => write!(f, "completed"),
            Self::Account => write!(f, "account"),
            Self::Tournament => write!(f, "tournament"),
            Self::Error(reason) => write!(f, "error:{reason}"),
        }
    }
}

/// A single human-readable message for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub kind: NoticeKind,
    pub message: String,
}

impl Notification {
    pub fn success(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            kind,
            message: message.into(),
        }
    }

    pub fn info(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            kind,
            message: message.into(),
        }
    }

    /// An error notice. `reason` becomes the `error:<reason>` code.
    pub fn error(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            kind: NoticeKind::Error(reason.into()),
            message: message.into(),
        }
    }

    /// Returns `true` for rejected-operation notices.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Receives notifications for display.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Queues notifications on a channel, like a toast queue drained by a UI.
/// If the receiver is gone the notification is dropped.
impl NotificationSink for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        let _ = self.send(notification);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NoticeLevel::Error => tracing::warn!(
                kind = %notification.kind,
                "{}",
                notification.message
            ),
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(
                kind = %notification.kind,
                "{}",
                notification.message
            ),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}
