use tokio::sync::mpsc;
use tracing::debug;

/// Category of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Informational status (recording started).
    Info,
    /// Microphone capture problems (permission, device loss).
    Capture,
    /// Gateway request failures (TTS, finalize-STT).
    Network,
    /// Playback/decode failures.
    Playback,
    /// Rejected input (blank submit).
    Input,
}

/// A user-visible, non-blocking notification (the UI renders these as toasts).
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub detail: String,
}

/// Cloneable handle for raising notifications.
///
/// Delivery is fire-and-forget: a closed receiver never blocks or fails the
/// pipeline that raised the notification.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Create a notifier together with the receiving end the UI drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(&self, kind: NotificationKind, title: &str, detail: &str) {
        let notification = Notification {
            kind,
            title: title.to_string(),
            detail: detail.to_string(),
        };

        if self.tx.send(notification).is_err() {
            debug!("notification receiver dropped; {} discarded", title);
        }
    }
}
