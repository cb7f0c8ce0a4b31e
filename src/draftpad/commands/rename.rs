use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DraftError, Result};
use crate::model::DocumentId;
use crate::store::DocumentStore;

pub async fn run<S: DocumentStore>(store: &S, id: DocumentId, title: &str) -> Result<CmdResult> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DraftError::Api("Title cannot be empty".into()));
    }

    store.rename(id, title).await?;
    let doc = store.get(id).await?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Renamed to \"{}\"", title)));
    Ok(result.with_affected_documents(doc.into_iter().collect()))
}
