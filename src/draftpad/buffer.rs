use parking_lot::RwLock;
use std::sync::Arc;

/// The live edit buffer.
///
/// Cloning the handle shares the text. Only the session replaces it; the
/// preview scheduler holds a clone so it can render whatever is current when
/// its timer fires.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    text: Arc<RwLock<String>>,
}

impl SharedBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Arc::new(RwLock::new(text.into())),
        }
    }

    pub fn snapshot(&self) -> String {
        self.text.read().clone()
    }

    pub fn with_text<T>(&self, f: impl FnOnce(&str) -> T) -> T {
        f(&self.text.read())
    }

    pub(crate) fn replace(&self, text: String) {
        *self.text.write() = text;
    }
}
