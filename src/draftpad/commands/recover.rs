use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

/// Reads the autosave slot without touching any session.
pub async fn run<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let record = store.autosave_read().await?;
    let mut result = CmdResult::default();
    if record.is_none() {
        result.add_message(CmdMessage::info("Nothing has been autosaved yet."));
    }
    Ok(result.with_autosave(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[tokio::test]
    async fn returns_slot_content() {
        let fixture = StoreFixture::new().with_autosave("half a thought").await;
        let result = run(&fixture.store).await.unwrap();
        assert_eq!(result.autosave.unwrap().content, "half a thought");
    }

    #[tokio::test]
    async fn empty_slot_is_reported() {
        let fixture = StoreFixture::new();
        let result = run(&fixture.store).await.unwrap();
        assert!(result.autosave.is_none());
        assert_eq!(result.messages.len(), 1);
    }
}
