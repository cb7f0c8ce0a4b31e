use draftpad::config::DraftConfig;
use draftpad::render::MarkdownRenderer;
use draftpad::session::{Binding, NavigationOutcome, NavigationState, PendingTarget, Session};
use draftpad::store::fs::FileStore;
use draftpad::store::memory::InMemoryStore;
use draftpad::store::DocumentStore;
use std::sync::Arc;
use std::time::Duration;

fn memory_session() -> (Arc<InMemoryStore>, Session<InMemoryStore, MarkdownRenderer>) {
    let store = Arc::new(InMemoryStore::new());
    let session = Session::new(
        Arc::clone(&store),
        Arc::new(MarkdownRenderer::new()),
        &DraftConfig::default(),
    );
    (store, session)
}

#[tokio::test(start_paused = true)]
async fn discard_then_reopen_shows_last_saved_text() {
    let (store, session) = memory_session();

    session.buffer_changed("# Doc1\n\nA");
    let doc1 = session.explicit_save("Doc1").await.unwrap().id().unwrap();
    let doc2 = store.create("Doc2", "# Doc2").await.unwrap();
    session.buffer_changed("# Doc1\n\nA changed");

    assert_eq!(
        session.open_by_id(doc2).await.unwrap(),
        NavigationOutcome::ConfirmRequired
    );
    assert!(matches!(
        session.navigation_state(),
        NavigationState::ConfirmPending(PendingTarget::Open(ref doc)) if doc.id == doc2
    ));
    assert_eq!(session.discard(), NavigationOutcome::Applied);
    assert_eq!(session.binding(), Binding::Bound(doc2));

    assert_eq!(
        session.open_by_id(doc1).await.unwrap(),
        NavigationOutcome::Applied
    );
    assert_eq!(session.buffer(), "# Doc1\n\nA");
}

#[tokio::test(start_paused = true)]
async fn preview_follows_the_loaded_document() {
    let (store, session) = memory_session();
    let id = store
        .create("Table", "| a | b |\n|---|---|\n| 1 | 2 |")
        .await
        .unwrap();

    session.buffer_changed("draft");
    tokio::time::sleep(Duration::from_millis(10)).await;
    session.open_by_id(id).await.unwrap();
    session.discard();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let preview = session.preview();
    assert!(preview.html().unwrap().contains("<table>"));
    assert_eq!(preview.applied(), 1);
}

#[tokio::test(start_paused = true)]
async fn autosave_slot_converges_on_displayed_document() {
    let (store, session) = memory_session();
    let id = store.create("Loaded", "loaded").await.unwrap();

    for text in ["t", "ty", "typ", "typed"] {
        session.buffer_changed(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    session.open_by_id(id).await.unwrap();
    assert_eq!(session.save_and_open().await.unwrap(), NavigationOutcome::Applied);
    tokio::time::sleep(Duration::from_secs(5)).await;

    let slot = store.autosave_read().await.unwrap().unwrap();
    assert_eq!(slot.content, "loaded");
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn recovery_survives_a_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = DraftConfig::default();

    {
        let store = Arc::new(FileStore::new(temp_dir.path().to_path_buf()));
        let session = Session::new(store, Arc::new(MarkdownRenderer::new()), &config);
        session.buffer_changed("typed before the crash");
        session.flush_autosave().await.unwrap();
    }

    let store = Arc::new(FileStore::new(temp_dir.path().to_path_buf()));
    let session = Session::new(
        Arc::clone(&store),
        Arc::new(MarkdownRenderer::new()),
        &config,
    );
    assert!(session.restore_autosave().await.unwrap());
    assert_eq!(session.buffer(), "typed before the crash");
    assert_eq!(session.binding(), Binding::Unbound);
    assert!(session.has_unsaved_changes());

    let id = session.explicit_save("").await.unwrap().id().unwrap();
    let doc = store.get(id).await.unwrap().unwrap();
    assert_eq!(doc.title, "typed before the crash");
    assert!(!session.has_unsaved_changes());
}
