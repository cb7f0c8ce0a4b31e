use crate::config::DraftConfig;
use crate::index::DisplayDocument;
use crate::model::{AutosaveRecord, Document};
use parking_lot::Mutex;
use std::sync::Arc;

pub mod config;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod recover;
pub mod rename;
pub mod search;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Messages produced outside a command's return path (background autosaves,
/// session transitions), held until the UI drains them.
#[derive(Debug, Clone, Default)]
pub struct MessageQueue {
    messages: Arc<Mutex<Vec<CmdMessage>>>,
}

impl MessageQueue {
    pub fn push(&self, message: CmdMessage) {
        self.messages.lock().push(message);
    }

    pub fn extend(&self, messages: impl IntoIterator<Item = CmdMessage>) {
        self.messages.lock().extend(messages);
    }

    pub fn take(&self) -> Vec<CmdMessage> {
        std::mem::take(&mut *self.messages.lock())
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_documents: Vec<Document>,
    pub listed_documents: Vec<DisplayDocument>,
    pub autosave: Option<AutosaveRecord>,
    pub config: Option<DraftConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_documents(mut self, docs: Vec<Document>) -> Self {
        self.affected_documents = docs;
        self
    }

    pub fn with_listed_documents(mut self, docs: Vec<DisplayDocument>) -> Self {
        self.listed_documents = docs;
        self
    }

    pub fn with_autosave(mut self, record: Option<AutosaveRecord>) -> Self {
        self.autosave = record;
        self
    }

    pub fn with_config(mut self, config: DraftConfig) -> Self {
        self.config = Some(config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drains_in_order() {
        let queue = MessageQueue::default();
        let handle = queue.clone();
        queue.push(CmdMessage::info("one"));
        handle.push(CmdMessage::error("two"));

        let drained = queue.take();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].level, MessageLevel::Error);
        assert!(handle.take().is_empty());
    }
}
