//! Transient user notifications
//!
//! Every error class and every action outcome surfaces here as a success or
//! error notification, auto-dismissed after a fixed delay by a spawned timer
//! task. Nothing in the pipeline propagates as an unhandled failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
}

/// Shared notification area with timed auto-dismiss
///
/// Auto-dismiss needs a tokio runtime; when pushed from outside one, the
/// notification is kept until explicitly read rather than panicking.
#[derive(Clone)]
pub struct Notifier {
    active: Arc<Mutex<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
    dismiss_after: Duration,
}

impl Notifier {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            active: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            dismiss_after,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&self, severity: Severity, message: String) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!(?severity, %message, "notification");
        {
            let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
            active.push(Notification {
                id,
                severity,
                message,
            });
        }

        // Timer task removes the notification after the fixed delay.
        // Outside a runtime there is nothing to run the timer, so the
        // notification simply stays visible instead of panicking.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let active = Arc::clone(&self.active);
            // Create the timer here so the delay is measured from the push,
            // not from when the spawned task is first polled.
            let sleep = tokio::time::sleep(self.dismiss_after);
            handle.spawn(async move {
                sleep.await;
                let mut active = active.lock().unwrap_or_else(|e| e.into_inner());
                active.retain(|n| n.id != id);
            });
        }
    }

    /// Currently visible notifications, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Most recent notification still visible
    pub fn latest(&self) -> Option<Notification> {
        self.active().last().cloned()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notifications_auto_dismiss_after_delay() {
        let notifier = Notifier::new(Duration::from_secs(3));
        notifier.success("Product registered");
        notifier.error("Transfer failed");
        assert_eq!(notifier.active().len(), 2);

        tokio::time::advance(Duration::from_secs(4)).await;
        // Yield so the timer tasks get to run
        tokio::task::yield_now().await;

        assert!(notifier.active().is_empty());
    }

    #[test]
    fn test_push_outside_a_runtime_does_not_panic() {
        // No tokio runtime here at all; the timer is skipped and the
        // notification stays visible
        let notifier = Notifier::default();
        notifier.error("backend unreachable");
        assert_eq!(notifier.active().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_ordered_oldest_first() {
        let notifier = Notifier::default();
        notifier.success("first");
        notifier.error("second");

        let active = notifier.active();
        assert_eq!(active[0].message, "first");
        assert_eq!(active[1].message, "second");
        assert_eq!(active[1].severity, Severity::Error);
        assert_eq!(notifier.latest().unwrap().message, "second");
    }
}
