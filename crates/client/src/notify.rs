//! Transient user notifications.
//!
//! The views surface business errors and confirmations through a
//! [`Notifier`] so the SDK never assumes a particular presentation.
//! Auth flows call [`Notifier::dismiss`] before issuing a fresh attempt
//! so messages from a prior attempt do not stack.

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Sink for transient user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);

    /// Drop any notification still showing.
    fn dismiss(&self);
}

/// Default notifier: routes notices to the tracing subscriber.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => tracing::info!("{message}"),
            NoticeLevel::Success => tracing::info!("{message}"),
            NoticeLevel::Error => tracing::error!("{message}"),
        }
    }

    fn dismiss(&self) {
        // Log lines cannot be retracted; nothing to do.
    }
}
