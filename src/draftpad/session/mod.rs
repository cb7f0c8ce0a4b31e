//! # Session Controller
//!
//! The session owns the edit buffer and the identity of the document it
//! belongs to, and sequences everything that can happen to them while renders,
//! autosaves and saves are in flight.
//!
//! ## State
//!
//! Two independent axes:
//!
//! ```text
//! binding:     Unbound | Bound(id)
//! navigation:  Idle | ConfirmPending(target) | SaveModalOpen | Busy
//! ```
//!
//! plus `last_saved_content`, the text last loaded from or written to the
//! store. [`Session::has_unsaved_changes`] compares the buffer with it exactly.
//! Autosave never touches it: the autosave slot is crash recovery, nothing more.
//!
//! ## Navigation
//!
//! Opening a document or starting a new one goes through
//! [`Session::request_open`] / [`Session::request_new`]. With no unsaved
//! changes the target is applied at once; otherwise it is parked in a
//! confirmation dialog, resolved by `discard`, `save_and_open` or `cancel`
//! (see `confirm.rs`).
//!
//! Applying a target always cancels the pending autosave *before* the buffer
//! is replaced, so a timer armed against the old text can never write it after
//! the new text is on screen. A fresh autosave of the new text is armed right
//! after.
//!
//! ## Locking
//!
//! All state sits behind `parking_lot` locks that are never held across an
//! `.await`. Lock order is session state, then buffer or scheduler slots. The
//! busy guards lock the state on drop, so they are always dropped after any
//! state guard in the same scope.

use crate::buffer::SharedBuffer;
use crate::commands::{self, CmdMessage, MessageQueue};
use crate::config::DraftConfig;
use crate::error::{DraftError, Result, StoreError};
use crate::index::DisplayDocument;
use crate::model::{derive_title, Document, DocumentId};
use crate::render::{PreviewSurface, Renderer};
use crate::scheduler::{AutosaveScheduler, PreviewScheduler};
use crate::store::DocumentStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

mod confirm;
mod state;

pub use state::{Binding, NavigationOutcome, NavigationState, PendingTarget, SaveOutcome};
pub use crate::commands::CmdMessage as SessionMessage;

use state::{BusyAction, BusyGuard, Dialog, SessionState};

struct Inner<S: DocumentStore, R: Renderer> {
    store: Arc<S>,
    buffer: SharedBuffer,
    state: Arc<Mutex<SessionState>>,
    preview: PreviewScheduler<R>,
    autosave: AutosaveScheduler<S>,
    messages: MessageQueue,
    fallback_title: String,
}

/// The editing session. Cheap to clone; clones drive the same session.
pub struct Session<S: DocumentStore, R: Renderer> {
    inner: Arc<Inner<S, R>>,
}

impl<S: DocumentStore, R: Renderer> Clone for Session<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DocumentStore, R: Renderer> Session<S, R> {
    /// Starts an empty, unbound session. Must be called inside a Tokio runtime.
    pub fn new(store: Arc<S>, renderer: Arc<R>, config: &DraftConfig) -> Self {
        let messages = MessageQueue::default();
        let inner = Inner {
            preview: PreviewScheduler::new(renderer, config.preview_window()),
            autosave: AutosaveScheduler::new(
                Arc::clone(&store),
                config.autosave_window(),
                messages.clone(),
            ),
            store,
            buffer: SharedBuffer::default(),
            state: Arc::new(Mutex::new(SessionState::default())),
            messages,
            fallback_title: config.fallback_title.clone(),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    // --- Accessors ---

    pub fn buffer(&self) -> String {
        self.inner.buffer.snapshot()
    }

    pub fn binding(&self) -> Binding {
        self.inner.state.lock().binding
    }

    pub fn navigation_state(&self) -> NavigationState {
        self.inner.state.lock().navigation_state()
    }

    pub fn pending_target(&self) -> Option<PendingTarget> {
        match &self.inner.state.lock().dialog {
            Dialog::Confirm(target) => Some(target.clone()),
            _ => None,
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        let state = self.inner.state.lock();
        self.differs_from_saved(&state)
    }

    pub fn preview(&self) -> PreviewSurface {
        self.inner.preview.surface()
    }

    pub fn autosave_pending(&self) -> bool {
        self.inner.autosave.is_pending()
    }

    /// Drains the notices queued since the last call.
    pub fn take_messages(&self) -> Vec<SessionMessage> {
        self.inner.messages.take()
    }

    pub async fn list_documents(&self) -> Result<Vec<DisplayDocument>> {
        Ok(commands::list::run(&*self.inner.store).await?.listed_documents)
    }

    pub async fn search_documents(&self, query: &str) -> Result<Vec<DisplayDocument>> {
        Ok(commands::search::run(&*self.inner.store, query)
            .await?
            .listed_documents)
    }

    // --- Editing ---

    /// The user edited the buffer.
    pub fn buffer_changed(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.buffer.replace(text.clone());
        self.inner.preview.request_preview(&self.inner.buffer);
        self.inner.autosave.schedule_autosave(text);
    }

    /// Title the save dialog should offer.
    pub async fn suggested_title(&self) -> Result<String> {
        let (binding, content) = self.capture();
        self.default_title(binding, &content).await
    }

    pub fn open_save_dialog(&self) -> bool {
        let mut state = self.inner.state.lock();
        if state.is_busy() || !matches!(state.dialog, Dialog::Closed) {
            return false;
        }
        state.dialog = Dialog::SaveAs;
        true
    }

    pub fn close_save_dialog(&self) -> bool {
        let mut state = self.inner.state.lock();
        if state.save_busy || !matches!(state.dialog, Dialog::SaveAs) {
            return false;
        }
        state.dialog = Dialog::Closed;
        true
    }

    /// Persists the buffer: updates the bound document, or creates one and
    /// binds to it. A blank `title` keeps the bound document's title, or
    /// falls back to the derived title for a new one.
    ///
    /// Returns [`SaveOutcome::Ignored`] while another save is running or the
    /// confirmation dialog is open.
    pub async fn explicit_save(&self, title: &str) -> Result<SaveOutcome> {
        let Some(_guard) = BusyGuard::acquire(&self.inner.state, BusyAction::Save) else {
            debug!("explicit save ignored, session busy");
            return Ok(SaveOutcome::Ignored);
        };

        let (binding, content) = self.capture();
        let title = match title.trim() {
            "" => self.report(self.default_title(binding, &content).await)?,
            given => given.to_string(),
        };

        let result = self.persist(binding, &title, &content).await;
        let outcome = self.report(result)?;
        if let Some(id) = outcome.id() {
            let mut state = self.inner.state.lock();
            state.binding = Binding::Bound(id);
            state.last_saved_content = content;
            if matches!(state.dialog, Dialog::SaveAs) {
                state.dialog = Dialog::Closed;
            }
        }
        info!(?outcome, %title, "document saved");
        self.inner
            .messages
            .push(CmdMessage::success(format!("Saved \"{}\"", title)));
        Ok(outcome)
    }

    // --- Navigation ---

    pub fn request_open(&self, doc: Document) -> NavigationOutcome {
        self.request(PendingTarget::Open(doc))
    }

    pub fn request_new(&self) -> NavigationOutcome {
        self.request(PendingTarget::NewDocument)
    }

    /// Fetches `id` from the store, then behaves like [`request_open`](Self::request_open).
    pub async fn open_by_id(&self, id: DocumentId) -> Result<NavigationOutcome> {
        let result = self
            .inner
            .store
            .get(id)
            .await
            .map_err(DraftError::from)
            .and_then(|doc| doc.ok_or_else(|| StoreError::NotFound(id).into()));
        let doc = self.report(result)?;
        Ok(self.request_open(doc))
    }

    fn request(&self, target: PendingTarget) -> NavigationOutcome {
        let mut state = self.inner.state.lock();
        if state.is_busy() || !matches!(state.dialog, Dialog::Closed) {
            debug!("navigation ignored, session not idle");
            return NavigationOutcome::Ignored;
        }
        if self.differs_from_saved(&state) {
            debug!("unsaved changes, asking for confirmation");
            state.dialog = Dialog::Confirm(target);
            return NavigationOutcome::ConfirmRequired;
        }
        self.apply_target(&mut state, target);
        NavigationOutcome::Applied
    }

    /// Replaces the buffer with `target`. Called with the state locked.
    fn apply_target(&self, state: &mut SessionState, target: PendingTarget) {
        self.inner.autosave.cancel_pending();

        let (binding, content) = match target {
            PendingTarget::NewDocument => (Binding::Unbound, String::new()),
            PendingTarget::Open(doc) => (Binding::Bound(doc.id), doc.content),
        };
        info!(?binding, "loading into buffer");
        state.binding = binding;
        state.last_saved_content = content.clone();
        state.dialog = Dialog::Closed;

        self.inner.buffer.replace(content.clone());
        self.inner.preview.request_preview(&self.inner.buffer);
        self.inner.autosave.schedule_autosave(content);
    }

    // --- Store maintenance ---

    pub async fn rename(&self, id: DocumentId, title: &str) -> Result<()> {
        let result = commands::rename::run(&*self.inner.store, id, title).await;
        let result = self.report(result)?;
        self.inner.messages.extend(result.messages);
        Ok(())
    }

    /// Deletes a document. Deleting the bound document unbinds the session
    /// but keeps the buffer, which then counts as unsaved.
    ///
    /// Saves and confirmation exits are refused until the delete finishes.
    pub async fn delete(&self, id: DocumentId) -> Result<()> {
        let Some(_guard) = BusyGuard::acquire(&self.inner.state, BusyAction::Delete) else {
            return Err(DraftError::Api(
                "Cannot delete while the session is busy".into(),
            ));
        };

        let result = commands::delete::run(&*self.inner.store, id).await;
        let result = self.report(result)?;

        {
            let mut state = self.inner.state.lock();
            if state.binding == Binding::Bound(id) {
                info!(%id, "bound document deleted, session unbound");
                state.binding = Binding::Unbound;
                state.last_saved_content.clear();
            }
            let opens_deleted = matches!(
                &state.dialog,
                Dialog::Confirm(PendingTarget::Open(doc)) if doc.id == id
            );
            if opens_deleted {
                state.dialog = Dialog::Closed;
                self.inner.messages.push(CmdMessage::warning(
                    "The document you were about to open was deleted",
                ));
            }
        }
        self.inner.messages.extend(result.messages);
        Ok(())
    }

    // --- Autosave slot ---

    /// Loads the autosave slot into the buffer, if there is one.
    ///
    /// Recovered text is not considered saved: the session stays unbound with
    /// an empty `last_saved_content`, so navigating away asks first.
    pub async fn restore_autosave(&self) -> Result<bool> {
        let result = self.inner.store.autosave_read().await;
        let Some(record) = self.report(result.map_err(DraftError::from))? else {
            return Ok(false);
        };

        {
            let mut state = self.inner.state.lock();
            if state.is_busy() || !matches!(state.dialog, Dialog::Closed) {
                return Ok(false);
            }
            self.inner.autosave.cancel_pending();
            state.binding = Binding::Unbound;
            state.last_saved_content.clear();
            self.inner.buffer.replace(record.content);
        }
        self.inner.preview.request_preview(&self.inner.buffer);
        info!(saved_at = %record.saved_at, "restored autosaved buffer");
        self.inner.messages.push(CmdMessage::info(format!(
            "Recovered unsaved text from {}",
            record.saved_at.format("%Y-%m-%d %H:%M")
        )));
        Ok(true)
    }

    /// Writes the buffer to the autosave slot now instead of waiting for the
    /// debounce window.
    pub async fn flush_autosave(&self) -> Result<()> {
        self.inner.autosave.cancel_pending();
        let content = self.buffer();
        let result = self.inner.store.autosave_write(&content).await;
        self.report(result.map_err(DraftError::from))
    }

    // --- Internals ---

    fn differs_from_saved(&self, state: &SessionState) -> bool {
        self.inner
            .buffer
            .with_text(|text| text != state.last_saved_content)
    }

    fn derived_title(&self, content: &str) -> String {
        derive_title(content, &self.inner.fallback_title)
    }

    /// The bound document's stored title, else the title derived from `content`.
    async fn default_title(&self, binding: Binding, content: &str) -> Result<String> {
        if let Binding::Bound(id) = binding {
            if let Some(doc) = self.inner.store.get(id).await? {
                return Ok(doc.title);
            }
        }
        Ok(self.derived_title(content))
    }

    fn capture(&self) -> (Binding, String) {
        let state = self.inner.state.lock();
        (state.binding, self.inner.buffer.snapshot())
    }

    async fn persist(&self, binding: Binding, title: &str, content: &str) -> Result<SaveOutcome> {
        let store = &self.inner.store;
        match binding {
            Binding::Bound(id) => {
                store.update(id, title, content).await?;
                Ok(SaveOutcome::Updated(id))
            }
            Binding::Unbound => Ok(SaveOutcome::Created(store.create(title, content).await?)),
        }
    }

    /// Queues an Error message for a failed result and passes it through.
    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!(error = %err, "session operation failed");
            self.inner.messages.push(CmdMessage::error(err.to_string()));
        }
        result
    }
}
