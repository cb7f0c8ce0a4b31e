use super::Debouncer;
use crate::commands::{CmdMessage, MessageQueue};
use crate::store::DocumentStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Debounced writes of the buffer into the autosave slot.
///
/// The content is captured when the write is scheduled. The session must call
/// [`cancel_pending`](Self::cancel_pending) before it replaces the buffer
/// wholesale, otherwise a timer armed against the old text could fire after the
/// new text is on screen.
pub struct AutosaveScheduler<S: DocumentStore> {
    store: Arc<S>,
    messages: MessageQueue,
    timer: Debouncer,
}

impl<S: DocumentStore> AutosaveScheduler<S> {
    pub fn new(store: Arc<S>, window: Duration, messages: MessageQueue) -> Self {
        Self {
            store,
            messages,
            timer: Debouncer::new(window),
        }
    }

    pub fn schedule_autosave(&self, content: String) {
        let store = Arc::clone(&self.store);
        let messages = self.messages.clone();
        self.timer.schedule(move || async move {
            match store.autosave_write(&content).await {
                Ok(()) => debug!(bytes = content.len(), "autosaved buffer"),
                Err(err) => {
                    warn!(error = %err, "autosave failed");
                    messages.push(CmdMessage::warning(format!("Autosave failed: {}", err)));
                }
            }
        });
    }

    /// Synchronously drop a write that has not fired yet.
    pub fn cancel_pending(&self) -> bool {
        let cancelled = self.timer.cancel();
        if cancelled {
            debug!("cancelled pending autosave");
        }
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::FlakyStore;
    use crate::store::memory::InMemoryStore;

    const WINDOW: Duration = Duration::from_millis(1000);

    fn scheduler() -> (Arc<FlakyStore>, MessageQueue, AutosaveScheduler<FlakyStore>) {
        let store = Arc::new(FlakyStore::new(InMemoryStore::new()));
        let messages = MessageQueue::default();
        let scheduler = AutosaveScheduler::new(Arc::clone(&store), WINDOW, messages.clone());
        (store, messages, scheduler)
    }

    async fn slot(store: &FlakyStore) -> Option<String> {
        store
            .inner
            .autosave_read()
            .await
            .unwrap()
            .map(|record| record.content)
    }

    #[tokio::test(start_paused = true)]
    async fn coalesces_into_one_write_of_latest_content() {
        let (store, _messages, scheduler) = scheduler();

        scheduler.schedule_autosave("a".into());
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.schedule_autosave("ab".into());
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.schedule_autosave("abc".into());
        tokio::time::sleep(WINDOW * 2).await;

        assert_eq!(store.autosave_writes(), 1);
        assert_eq!(slot(&store).await.as_deref(), Some("abc"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_leaves_slot_untouched() {
        let (store, _messages, scheduler) = scheduler();
        store.inner.autosave_write("recovered").await.unwrap();

        scheduler.schedule_autosave("stale".into());
        assert!(scheduler.is_pending());
        assert!(scheduler.cancel_pending());
        tokio::time::sleep(WINDOW * 3).await;

        assert_eq!(store.autosave_writes(), 0);
        assert_eq!(slot(&store).await.as_deref(), Some("recovered"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_reported_as_warning() {
        let (store, messages, scheduler) = scheduler();
        store.set_failing(true);

        scheduler.schedule_autosave("text".into());
        tokio::time::sleep(WINDOW * 2).await;

        let drained = messages.take();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].level, MessageLevel::Warning);
        assert!(drained[0].content.contains("disk full"));
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_write_is_not_aborted_by_cancel() {
        let (store, _messages, scheduler) = scheduler();
        store.set_latency(Duration::from_millis(500));

        scheduler.schedule_autosave("in flight".into());
        tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;
        assert!(!scheduler.cancel_pending());
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(slot(&store).await.as_deref(), Some("in flight"));
    }
}
