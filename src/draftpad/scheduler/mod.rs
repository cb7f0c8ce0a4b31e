//! # Debounced Scheduling
//!
//! Both the preview and the autosave run behind a [`Debouncer`]: a single
//! cancellable scheduled call. Every `schedule` restarts the quiet period, and
//! `cancel` drops whatever has not fired yet.
//!
//! ## Fire vs. Cancel
//!
//! A scheduled call goes through two phases:
//!
//! ```text
//! schedule ──► waiting (sleep) ──► claimed ──► running action to completion
//!                 ▲    │
//!      cancel ────┘    └── superseded by a newer schedule
//! ```
//!
//! Cancellation is synchronous: once `cancel` returns, a call that was still
//! waiting will never run its action, even if its sleep already elapsed and the
//! task is queued to be polled. A call that already claimed its slot is left
//! alone; the external store and renderer cannot be interrupted mid-flight.
//!
//! The timer is tokio's, so tests drive it with a paused clock
//! (`#[tokio::test(start_paused = true)]`) instead of real waiting.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub mod autosave;
pub mod preview;

pub use autosave::AutosaveScheduler;
pub use preview::PreviewScheduler;

#[derive(Default)]
struct Slot {
    epoch: u64,
    waiting: Option<JoinHandle<()>>,
}

/// A cancellable, restartable delayed call.
///
/// Must be used from within a Tokio runtime.
pub struct Debouncer {
    window: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Run `action` once `window` has passed without another `schedule` or
    /// `cancel`. Replaces any call still waiting.
    pub fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.slot.lock();
        slot.epoch += 1;
        let epoch = slot.epoch;
        if let Some(previous) = slot.waiting.take() {
            previous.abort();
        }

        let shared = Arc::clone(&self.slot);
        let window = self.window;
        slot.waiting = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            {
                let mut slot = shared.lock();
                if slot.epoch != epoch {
                    return;
                }
                // Claimed: from here on the action runs to completion.
                slot.waiting = None;
            }
            action().await;
        }));
    }

    /// Drop the waiting call, if any. Returns whether one was dropped.
    pub fn cancel(&self) -> bool {
        let mut slot = self.slot.lock();
        slot.epoch += 1;
        match slot.waiting.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().waiting.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_action(count: &Arc<AtomicUsize>) -> impl FnOnce() -> std::future::Ready<()> {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_quiet_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.schedule(counter_action(&count));
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_restarts_the_window() {
        let count = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        for _ in 0..5 {
            debouncer.schedule(counter_action(&count));
            tokio::time::sleep(Duration::from_millis(60)).await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let count = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.schedule(counter_action(&count));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(10));
            debouncer.schedule(counter_action(&count));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
