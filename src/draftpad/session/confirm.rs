//! Exits of the navigation confirmation dialog.

use super::state::{BusyAction, BusyGuard, Dialog};
use super::{Binding, NavigationOutcome, Session};
use crate::commands::CmdMessage;
use crate::error::Result;
use crate::render::Renderer;
use crate::store::DocumentStore;
use tracing::{debug, info, warn};

impl<S: DocumentStore, R: Renderer> Session<S, R> {
    /// Throws the unsaved changes away and applies the pending target.
    pub fn discard(&self) -> NavigationOutcome {
        let mut state = self.inner.state.lock();
        if state.is_busy() {
            return NavigationOutcome::Ignored;
        }
        match std::mem::take(&mut state.dialog) {
            Dialog::Confirm(target) => {
                info!("discarding unsaved changes");
                self.apply_target(&mut state, target);
                NavigationOutcome::Applied
            }
            other => {
                state.dialog = other;
                NavigationOutcome::Ignored
            }
        }
    }

    /// Closes the dialog and forgets the pending target.
    pub fn cancel(&self) -> NavigationOutcome {
        let mut state = self.inner.state.lock();
        if state.is_busy() || !matches!(state.dialog, Dialog::Confirm(_)) {
            return NavigationOutcome::Ignored;
        }
        state.dialog = Dialog::Closed;
        debug!("navigation cancelled");
        NavigationOutcome::Cancelled
    }

    /// Saves the buffer under its derived title, then applies the pending
    /// target.
    ///
    /// On a store failure the dialog stays open with its target and the error
    /// is returned. If the buffer changed while the save was in flight, the
    /// saved text is kept but navigation is held back with
    /// [`NavigationOutcome::ConfirmRequired`] so the newer edits are not lost.
    pub async fn save_and_open(&self) -> Result<NavigationOutcome> {
        let Some(_guard) = BusyGuard::acquire(&self.inner.state, BusyAction::Confirm) else {
            debug!("save and open ignored");
            return Ok(NavigationOutcome::Ignored);
        };

        let (binding, content) = self.capture();
        let title = self.derived_title(&content);
        let result = self.persist(binding, &title, &content).await;
        let outcome = self.report(result)?;

        let mut state = self.inner.state.lock();
        if let Some(id) = outcome.id() {
            state.binding = Binding::Bound(id);
        }
        state.last_saved_content = content;
        info!(?outcome, %title, "saved before navigating");
        self.inner
            .messages
            .push(CmdMessage::success(format!("Saved \"{}\"", title)));

        if self.differs_from_saved(&state) {
            warn!("buffer changed during save, navigation held");
            self.inner.messages.push(CmdMessage::warning(
                "The text changed while saving; confirm again to continue",
            ));
            return Ok(NavigationOutcome::ConfirmRequired);
        }

        match std::mem::take(&mut state.dialog) {
            Dialog::Confirm(target) => {
                self.apply_target(&mut state, target);
                Ok(NavigationOutcome::Applied)
            }
            other => {
                state.dialog = other;
                Ok(NavigationOutcome::Ignored)
            }
        }
    }
}
