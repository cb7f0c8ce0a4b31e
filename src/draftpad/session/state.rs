use crate::model::{Document, DocumentId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Which stored document, if any, the buffer belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Binding {
    #[default]
    Unbound,
    Bound(DocumentId),
}

impl Binding {
    pub fn id(&self) -> Option<DocumentId> {
        match self {
            Binding::Unbound => None,
            Binding::Bound(id) => Some(*id),
        }
    }
}

/// Where a navigation wants to go once the user has confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingTarget {
    NewDocument,
    Open(Document),
}

/// Navigation axis of the session, as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    Idle,
    ConfirmPending(PendingTarget),
    SaveModalOpen,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The target is now on screen
    Applied,
    /// The confirmation dialog is (still) open
    ConfirmRequired,
    /// The dialog was closed without navigating
    Cancelled,
    /// The trigger arrived while it could not act and was dropped
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(DocumentId),
    Updated(DocumentId),
    Ignored,
}

impl SaveOutcome {
    pub fn id(&self) -> Option<DocumentId> {
        match self {
            SaveOutcome::Created(id) | SaveOutcome::Updated(id) => Some(*id),
            SaveOutcome::Ignored => None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) enum Dialog {
    #[default]
    Closed,
    Confirm(PendingTarget),
    SaveAs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BusyAction {
    Save,
    Confirm,
    Delete,
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub binding: Binding,
    pub last_saved_content: String,
    pub dialog: Dialog,
    pub save_busy: bool,
    pub confirm_busy: bool,
    pub delete_busy: bool,
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        self.save_busy || self.confirm_busy || self.delete_busy
    }

    pub fn navigation_state(&self) -> NavigationState {
        if self.is_busy() {
            return NavigationState::Busy;
        }
        match &self.dialog {
            Dialog::Closed => NavigationState::Idle,
            Dialog::Confirm(target) => NavigationState::ConfirmPending(target.clone()),
            Dialog::SaveAs => NavigationState::SaveModalOpen,
        }
    }

    fn may_start(&self, action: BusyAction) -> bool {
        if self.is_busy() {
            return false;
        }
        match action {
            BusyAction::Save => matches!(self.dialog, Dialog::Closed | Dialog::SaveAs),
            BusyAction::Confirm => matches!(self.dialog, Dialog::Confirm(_)),
            BusyAction::Delete => true,
        }
    }

    fn set_busy(&mut self, action: BusyAction, busy: bool) {
        match action {
            BusyAction::Save => self.save_busy = busy,
            BusyAction::Confirm => self.confirm_busy = busy,
            BusyAction::Delete => self.delete_busy = busy,
        }
    }
}

/// Holds one busy flag for the lifetime of a save or delete.
///
/// Dropping the guard clears the flag on every exit path, including errors
/// and a dropped future. The guard locks the state when dropped, so it must
/// never be dropped while the caller still holds that lock.
pub(crate) struct BusyGuard {
    state: Arc<Mutex<SessionState>>,
    action: BusyAction,
}

impl BusyGuard {
    /// Sets the flag for `action`, or returns `None` if the action may not
    /// start right now.
    pub fn acquire(state: &Arc<Mutex<SessionState>>, action: BusyAction) -> Option<Self> {
        let mut locked = state.lock();
        if !locked.may_start(action) {
            return None;
        }
        locked.set_busy(action, true);
        Some(Self {
            state: Arc::clone(state),
            action,
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.lock().set_busy(self.action, false);
    }
}
