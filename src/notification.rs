//! Transient, self-dismissing notices
//!
//! At most one notice is visible. Raising a new one replaces the old one and
//! restarts the dismissal timer; only the newest timer can ever clear the slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// A visible notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub expires_after: Duration,
}

#[derive(Debug, Default)]
struct TimerSlot {
    /// Bumped on every notify/dismiss; a timer only fires for its own generation
    generation: u64,
    cancel: Option<CancellationToken>,
}

/// Cloneable handle to the single notification slot
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    current: Arc<watch::Sender<Option<Notification>>>,
    timer: Arc<Mutex<TimerSlot>>,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            current: Arc::new(tx),
            timer: Arc::new(Mutex::new(TimerSlot::default())),
        }
    }

    fn timer(&self) -> MutexGuard<'_, TimerSlot> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show `message`, replacing any current notice, and dismiss it after
    /// `duration` unless something else happens first.
    pub fn notify(&self, message: impl Into<String>, duration: Duration) {
        let notification = Notification {
            message: message.into(),
            expires_after: duration,
        };

        let mut slot = self.timer();
        if let Some(previous) = slot.cancel.take() {
            previous.cancel();
        }
        slot.generation += 1;
        let generation = slot.generation;

        tracing::debug!(generation, message = %notification.message, "Notification raised");
        self.current.send_replace(Some(notification));

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, notification will not auto-dismiss");
            return;
        };

        let token = CancellationToken::new();
        slot.cancel = Some(token.clone());
        drop(slot);

        let channel = self.clone();
        runtime.spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(duration) => channel.expire(generation),
                () = token.cancelled() => {}
            }
        });
    }

    /// Clear the current notice now
    pub fn dismiss(&self) {
        let mut slot = self.timer();
        if let Some(timer) = slot.cancel.take() {
            timer.cancel();
        }
        slot.generation += 1;
        self.current.send_replace(None);
    }

    fn expire(&self, generation: u64) {
        let mut slot = self.timer();
        if slot.generation != generation {
            return;
        }
        slot.cancel = None;
        slot.generation += 1;
        tracing::debug!(generation, "Notification expired");
        self.current.send_replace(None);
    }

    pub fn current(&self) -> Option<Notification> {
        self.current.borrow().clone()
    }

    /// Watch the slot for changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.current.subscribe()
    }
}
