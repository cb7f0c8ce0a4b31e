use super::{next_timestamp, sort_newest_first, title_matches, DocumentStore};
use crate::error::{StoreError, StoreResult};
use crate::model::{AutosaveRecord, Document, DocumentId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for testing and throwaway sessions.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    documents: HashMap<DocumentId, Document>,
    autosave: Option<AutosaveRecord>,
    last_stamp: Option<DateTime<Utc>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for InMemoryStore {
    async fn autosave_write(&self, content: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        let saved_at = next_timestamp(&mut inner.last_stamp);
        inner.autosave = Some(AutosaveRecord {
            content: content.to_string(),
            saved_at,
        });
        Ok(())
    }

    async fn autosave_read(&self) -> StoreResult<Option<AutosaveRecord>> {
        Ok(self.inner.lock().autosave.clone())
    }

    async fn create(&self, title: &str, content: &str) -> StoreResult<DocumentId> {
        let mut inner = self.inner.lock();
        let now = next_timestamp(&mut inner.last_stamp);
        let doc = Document {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        let id = doc.id;
        inner.documents.insert(id, doc);
        Ok(id)
    }

    async fn update(&self, id: DocumentId, title: &str, content: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        let now = next_timestamp(&mut inner.last_stamp);
        let doc = inner
            .documents
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        doc.title = title.to_string();
        doc.content = content.to_string();
        doc.updated_at = now;
        Ok(())
    }

    async fn get(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        Ok(self.inner.lock().documents.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Document>> {
        let mut docs: Vec<Document> = self.inner.lock().documents.values().cloned().collect();
        sort_newest_first(&mut docs);
        Ok(docs)
    }

    async fn search(&self, query: &str) -> StoreResult<Vec<Document>> {
        let query_lower = query.to_lowercase();
        let mut docs: Vec<Document> = self
            .inner
            .lock()
            .documents
            .values()
            .filter(|doc| title_matches(doc, &query_lower))
            .cloned()
            .collect();
        sort_newest_first(&mut docs);
        Ok(docs)
    }

    async fn rename(&self, id: DocumentId, title: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        let now = next_timestamp(&mut inner.last_stamp);
        let doc = inner
            .documents
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        doc.title = title.to_string();
        doc.updated_at = now;
        Ok(())
    }

    async fn delete(&self, id: DocumentId) -> StoreResult<()> {
        if self.inner.lock().documents.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Creates the documents in order, so the last one is the newest.
        pub async fn with_documents(self, docs: &[(&str, &str)]) -> Self {
            for (title, content) in docs {
                self.store.create(title, content).await.unwrap();
            }
            self
        }

        pub async fn with_autosave(self, content: &str) -> Self {
            self.store.autosave_write(content).await.unwrap();
            self
        }
    }

    /// Wraps an [`InMemoryStore`] with artificial latency and switchable failures.
    ///
    /// Latency uses `tokio::time::sleep`, so under a paused test clock calls
    /// suspend until time is advanced.
    #[derive(Default)]
    pub struct FlakyStore {
        pub inner: InMemoryStore,
        latency_ms: AtomicUsize,
        failing: AtomicBool,
        autosave_writes: AtomicUsize,
    }

    impl FlakyStore {
        pub fn new(inner: InMemoryStore) -> Self {
            Self {
                inner,
                ..Self::default()
            }
        }

        pub fn set_latency(&self, latency: Duration) {
            self.latency_ms
                .store(latency.as_millis() as usize, Ordering::SeqCst);
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn autosave_writes(&self) -> usize {
            self.autosave_writes.load(Ordering::SeqCst)
        }

        async fn pause(&self) -> StoreResult<()> {
            let ms = self.latency_ms.load(Ordering::SeqCst);
            if ms > 0 {
                tokio::time::sleep(Duration::from_millis(ms as u64)).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("disk full".to_string()));
            }
            Ok(())
        }
    }

    impl DocumentStore for FlakyStore {
        async fn autosave_write(&self, content: &str) -> StoreResult<()> {
            self.pause().await?;
            self.autosave_writes.fetch_add(1, Ordering::SeqCst);
            self.inner.autosave_write(content).await
        }

        async fn autosave_read(&self) -> StoreResult<Option<AutosaveRecord>> {
            self.pause().await?;
            self.inner.autosave_read().await
        }

        async fn create(&self, title: &str, content: &str) -> StoreResult<DocumentId> {
            self.pause().await?;
            self.inner.create(title, content).await
        }

        async fn update(&self, id: DocumentId, title: &str, content: &str) -> StoreResult<()> {
            self.pause().await?;
            self.inner.update(id, title, content).await
        }

        async fn get(&self, id: DocumentId) -> StoreResult<Option<Document>> {
            self.pause().await?;
            self.inner.get(id).await
        }

        async fn list(&self) -> StoreResult<Vec<Document>> {
            self.pause().await?;
            self.inner.list().await
        }

        async fn search(&self, query: &str) -> StoreResult<Vec<Document>> {
            self.pause().await?;
            self.inner.search(query).await
        }

        async fn rename(&self, id: DocumentId, title: &str) -> StoreResult<()> {
            self.pause().await?;
            self.inner.rename(id, title).await
        }

        async fn delete(&self, id: DocumentId) -> StoreResult<()> {
            self.pause().await?;
            self.inner.delete(id).await
        }
    }
}
