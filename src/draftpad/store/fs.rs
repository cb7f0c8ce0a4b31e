use super::{next_timestamp, sort_newest_first, title_matches, DocumentStore};
use crate::error::{StoreError, StoreResult};
use crate::model::{AutosaveRecord, Document, DocumentId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

const DOCUMENTS_FILENAME: &str = "documents.json";
const AUTOSAVE_FILENAME: &str = "autosave.json";

/// JSON file storage rooted at a data directory.
///
/// ```text
/// <root>/
/// ├── documents.json   # map of id -> document
/// ├── autosave.json    # the autosave slot
/// └── config.json      # see DraftConfig
/// ```
pub struct FileStore {
    root: PathBuf,
    // Serializes read-modify-write cycles and remembers the last handed-out stamp.
    write_lock: Mutex<Option<DateTime<Utc>>>,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn ensure_dir(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    async fn load_documents(&self) -> StoreResult<HashMap<DocumentId, Document>> {
        let path = self.root.join(DOCUMENTS_FILENAME);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save_documents(&self, docs: &HashMap<DocumentId, Document>) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(docs)?;
        self.write_atomic(DOCUMENTS_FILENAME, &content).await
    }

    async fn write_atomic(&self, filename: &str, content: &str) -> StoreResult<()> {
        self.ensure_dir().await?;
        let target = self.root.join(filename);
        let tmp = self.root.join(format!(".{}.tmp", filename));
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &target).await?;
        Ok(())
    }

    async fn modify<T: Send>(
        &self,
        f: impl FnOnce(&mut HashMap<DocumentId, Document>, DateTime<Utc>) -> StoreResult<T> + Send,
    ) -> StoreResult<T> {
        let mut last_stamp = self.write_lock.lock().await;
        let mut docs = self.load_documents().await?;
        let now = next_timestamp(&mut last_stamp);
        let value = f(&mut docs, now)?;
        self.save_documents(&docs).await?;
        Ok(value)
    }
}

impl DocumentStore for FileStore {
    async fn autosave_write(&self, content: &str) -> StoreResult<()> {
        let mut last_stamp = self.write_lock.lock().await;
        let record = AutosaveRecord {
            content: content.to_string(),
            saved_at: next_timestamp(&mut last_stamp),
        };
        let json = serde_json::to_string_pretty(&record)?;
        self.write_atomic(AUTOSAVE_FILENAME, &json).await
    }

    async fn autosave_read(&self) -> StoreResult<Option<AutosaveRecord>> {
        let path = self.root.join(AUTOSAVE_FILENAME);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn create(&self, title: &str, content: &str) -> StoreResult<DocumentId> {
        let title = title.to_string();
        let content = content.to_string();
        self.modify(move |docs, now| {
            let doc = Document {
                id: Uuid::new_v4(),
                title,
                content,
                created_at: now,
                updated_at: now,
            };
            let id = doc.id;
            docs.insert(id, doc);
            Ok(id)
        })
        .await
    }

    async fn update(&self, id: DocumentId, title: &str, content: &str) -> StoreResult<()> {
        let title = title.to_string();
        let content = content.to_string();
        self.modify(move |docs, now| {
            let doc = docs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            doc.title = title;
            doc.content = content;
            doc.updated_at = now;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        let _guard = self.write_lock.lock().await;
        Ok(self.load_documents().await?.remove(&id))
    }

    async fn list(&self) -> StoreResult<Vec<Document>> {
        let _guard = self.write_lock.lock().await;
        let mut docs: Vec<Document> = self.load_documents().await?.into_values().collect();
        sort_newest_first(&mut docs);
        Ok(docs)
    }

    async fn search(&self, query: &str) -> StoreResult<Vec<Document>> {
        let query_lower = query.to_lowercase();
        let _guard = self.write_lock.lock().await;
        let mut docs: Vec<Document> = self
            .load_documents()
            .await?
            .into_values()
            .filter(|doc| title_matches(doc, &query_lower))
            .collect();
        sort_newest_first(&mut docs);
        Ok(docs)
    }

    async fn rename(&self, id: DocumentId, title: &str) -> StoreResult<()> {
        let title = title.to_string();
        self.modify(move |docs, now| {
            let doc = docs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            doc.title = title;
            doc.updated_at = now;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: DocumentId) -> StoreResult<()> {
        self.modify(move |docs, _| {
            docs.remove(&id).ok_or(StoreError::NotFound(id))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = FileStore::new(temp_dir.path().join("data"));
        (temp_dir, store)
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (_dir, store) = store();
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.autosave_read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn documents_survive_a_new_handle() {
        let (dir, store) = store();
        let id = store.create("Doc1", "# Doc1\nbody").await.unwrap();
        drop(store);

        let reopened = FileStore::new(dir.path().join("data"));
        let doc = reopened.get(id).await.unwrap().unwrap();
        assert_eq!(doc.title, "Doc1");
        assert_eq!(doc.content, "# Doc1\nbody");
    }

    #[tokio::test]
    async fn update_and_rename_bump_updated_at() {
        let (_dir, store) = store();
        let a = store.create("A", "a").await.unwrap();
        let b = store.create("B", "b").await.unwrap();

        store.update(a, "A", "a2").await.unwrap();
        let titles: Vec<_> = store.list().await.unwrap().into_iter().map(|d| d.title).collect();
        assert_eq!(titles, ["A", "B"]);

        store.rename(b, "Bee").await.unwrap();
        let docs = store.list().await.unwrap();
        assert_eq!(docs[0].title, "Bee");
        assert_eq!(docs[0].content, "b");
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.update(id, "t", "c").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound(_))));
        assert!(store.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let (_dir, store) = store();
        let id = store.create("Gone", "").await.unwrap();
        store.delete(id).await.unwrap();
        assert!(store.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_filters_titles() {
        let (_dir, store) = store();
        store.create("Travel plans", "").await.unwrap();
        store.create("Budget", "travel costs").await.unwrap();
        let found = store.search("TRAVEL").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Travel plans");
    }

    #[tokio::test]
    async fn autosave_round_trips_through_disk() {
        let (dir, store) = store();
        store.autosave_write("draft one").await.unwrap();
        store.autosave_write("draft two").await.unwrap();

        let reopened = FileStore::new(dir.path().join("data"));
        let record = reopened.autosave_read().await.unwrap().unwrap();
        assert_eq!(record.content, "draft two");
        assert!(!dir.path().join("data").join(".autosave.json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_index_is_a_serialization_error() {
        let (dir, store) = store();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data").join(DOCUMENTS_FILENAME), "{not json").unwrap();
        assert!(matches!(
            store.list().await,
            Err(StoreError::Serialization(_))
        ));
    }
}
